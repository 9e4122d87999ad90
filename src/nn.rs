//! Minimal forward-pass layers for the bundled text classifiers

use serde::{Deserialize, Serialize};

/// Fully connected layer; `weights` holds one row per output unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dense {
    pub weights: Vec<Vec<f32>>,
    pub bias: Vec<f32>,
}

impl Dense {
    pub fn input_dim(&self) -> usize {
        self.weights.first().map(Vec::len).unwrap_or(0)
    }

    pub fn output_dim(&self) -> usize {
        self.weights.len()
    }

    /// Check the layer is rectangular and accepts `input_dim` inputs
    pub fn check(&self, input_dim: usize) -> Result<(), String> {
        if self.weights.is_empty() {
            return Err("dense layer has no output units".to_string());
        }
        if self.bias.len() != self.weights.len() {
            return Err(format!(
                "bias has {} entries but layer has {} output units",
                self.bias.len(),
                self.weights.len()
            ));
        }
        if let Some(row) = self.weights.iter().position(|r| r.len() != input_dim) {
            return Err(format!(
                "weight row {} has {} inputs, expected {}",
                row,
                self.weights[row].len(),
                input_dim
            ));
        }
        Ok(())
    }

    pub fn forward(&self, input: &[f32]) -> Vec<f32> {
        self.weights
            .iter()
            .zip(&self.bias)
            .map(|(row, b)| row.iter().zip(input).map(|(w, x)| w * x).sum::<f32>() + b)
            .collect()
    }
}

/// Word embedding table indexed by vocabulary id (row 0 is padding)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Embedding(pub Vec<Vec<f32>>);

impl Embedding {
    pub fn rows(&self) -> usize {
        self.0.len()
    }

    pub fn dim(&self) -> usize {
        self.0.first().map(Vec::len).unwrap_or(0)
    }

    pub fn check(&self) -> Result<(), String> {
        let dim = self.dim();
        if dim == 0 {
            return Err("embedding table is empty".to_string());
        }
        if let Some(row) = self.0.iter().position(|r| r.len() != dim) {
            return Err(format!(
                "embedding row {} has width {}, expected {}",
                row,
                self.0[row].len(),
                dim
            ));
        }
        Ok(())
    }

    /// Average the embeddings of the given token ids.
    ///
    /// Returns `None` for an empty sequence or an id outside the table.
    pub fn mean_pool(&self, ids: &[usize]) -> Option<Vec<f32>> {
        if ids.is_empty() {
            return None;
        }

        let mut pooled = vec![0.0f32; self.dim()];
        for &id in ids {
            let row = self.0.get(id)?;
            for (acc, &val) in pooled.iter_mut().zip(row) {
                *acc += val;
            }
        }

        let n = ids.len() as f32;
        for v in &mut pooled {
            *v /= n;
        }
        Some(pooled)
    }
}

pub fn relu(v: &mut [f32]) {
    for x in v.iter_mut() {
        *x = x.max(0.0);
    }
}

/// Numerically stable softmax
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&x| (x - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// Index and value of the largest entry; the first one wins ties
pub fn argmax(v: &[f32]) -> Option<(usize, f32)> {
    v.iter()
        .copied()
        .enumerate()
        .fold(None, |best, (i, x)| match best {
            Some((_, bx)) if bx >= x => best,
            _ => Some((i, x)),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dense() -> Dense {
        Dense {
            weights: vec![vec![1.0, 0.0], vec![0.0, 2.0], vec![1.0, 1.0]],
            bias: vec![0.0, 0.5, -1.0],
        }
    }

    #[test]
    fn test_dense_forward() {
        let layer = dense();
        assert_eq!(layer.input_dim(), 2);
        assert_eq!(layer.output_dim(), 3);
        assert_eq!(layer.forward(&[1.0, 2.0]), vec![1.0, 4.5, 2.0]);
    }

    #[test]
    fn test_dense_check_catches_shape_errors() {
        let layer = dense();
        assert!(layer.check(2).is_ok());
        assert!(layer.check(3).unwrap_err().contains("expected 3"));

        let mut bad_bias = dense();
        bad_bias.bias.pop();
        assert!(bad_bias.check(2).unwrap_err().contains("bias"));
    }

    #[test]
    fn test_embedding_mean_pool() {
        let emb = Embedding(vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![0.0, 3.0]]);
        assert!(emb.check().is_ok());
        assert_eq!(emb.mean_pool(&[1, 2]), Some(vec![0.5, 1.5]));
        assert_eq!(emb.mean_pool(&[]), None);
        assert_eq!(emb.mean_pool(&[7]), None);
    }

    #[test]
    fn test_embedding_check_ragged() {
        let emb = Embedding(vec![vec![0.0, 0.0], vec![1.0]]);
        assert!(emb.check().is_err());
        assert!(Embedding(vec![]).check().is_err());
    }

    #[test]
    fn test_softmax_sums_to_one() {
        let probs = softmax(&[1.0, 2.0, 3.0]);
        let sum: f32 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
        assert!(probs[2] > probs[1] && probs[1] > probs[0]);

        // Large logits must not overflow
        let probs = softmax(&[1000.0, 0.0]);
        assert!(probs.iter().all(|p| p.is_finite()));
    }

    #[test]
    fn test_argmax_and_relu() {
        assert_eq!(argmax(&[0.1, 0.7, 0.2]), Some((1, 0.7)));
        assert_eq!(argmax(&[0.5, 0.5]), Some((0, 0.5)));
        assert_eq!(argmax(&[]), None);

        let mut v = vec![-1.0, 2.0];
        relu(&mut v);
        assert_eq!(v, vec![0.0, 2.0]);
    }
}
