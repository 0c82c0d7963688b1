use candle::{DType, Device, Result, Tensor};
use candle_core as candle;
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config};
use std::path::Path;
use std::sync::Arc;

/// BERT encoder producing mean-pooled sentence embeddings.
#[derive(Clone)]
pub struct BertEncoder {
    model: Arc<BertModel>,
    hidden_size: usize,
}

impl BertEncoder {
    /// Loads `config.json` + `model.safetensors` from `model_dir`.
    pub fn load<P: AsRef<Path>>(model_dir: P, device: &Device) -> Result<Self> {
        let model_dir = model_dir.as_ref();
        let config_content = std::fs::read_to_string(model_dir.join("config.json"))?;

        let raw: serde_json::Value = serde_json::from_str(&config_content)
            .map_err(|e| candle::Error::Msg(format!("Failed to parse config: {}", e)))?;
        let hidden_size = raw
            .get("hidden_size")
            .and_then(serde_json::Value::as_u64)
            .ok_or_else(|| candle::Error::Msg("config.json lacks hidden_size".to_string()))?
            as usize;
        let config: Config = serde_json::from_value(raw)
            .map_err(|e| candle::Error::Msg(format!("Failed to parse config: {}", e)))?;

        let weights_path = model_dir.join("model.safetensors");
        // SAFETY: the weights file is memory-mapped read-only for the encoder's lifetime.
        let vb =
            unsafe { VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, device)? };

        // Sentence-transformer exports store the encoder at the root; HF exports nest it.
        let model = if vb.contains_tensor("bert.embeddings.word_embeddings.weight") {
            BertModel::load(vb.pp("bert"), &config)?
        } else {
            BertModel::load(vb, &config)?
        };

        Ok(Self {
            model: Arc::new(model),
            hidden_size,
        })
    }

    pub fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    /// Runs the encoder and averages token states over the attention mask.
    ///
    /// `input_ids` and `attention_mask` have shape `[1, seq_len]`; returns `[hidden_size]`.
    pub fn encode(&self, input_ids: &Tensor, attention_mask: &Tensor) -> Result<Vec<f32>> {
        let token_type_ids = input_ids.zeros_like()?;
        let hidden = self
            .model
            .forward(input_ids, &token_type_ids, Some(attention_mask))?;

        let mask = attention_mask.to_dtype(DType::F32)?.unsqueeze(2)?;
        let summed = hidden.broadcast_mul(&mask)?.sum(1)?;
        let counts = mask.sum(1)?;
        let pooled = summed.broadcast_div(&counts)?;

        pooled.squeeze(0)?.to_vec1::<f32>()
    }
}
