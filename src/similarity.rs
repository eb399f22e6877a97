//! Estratégias de representação e de score do ranker.
//!
//! Duas estratégias intercambiáveis por trás do mesmo contrato (score em
//! [0, 1], semântica de limiar idêntica):
//!   - `Densa`: codificador de texto de dimensão fixa por feature hashing
//!     (tokens + trigramas de caracteres), comparado por similaridade de
//!     cosseno;
//!   - `Termos`: assinatura esparsa de frequência de termos, comparada por
//!     Jaccard ponderado. Modo degradado sem nenhuma dependência de modelo.
//!
//! A normalização aplicada ao corpus e à consulta é sempre a mesma.

use std::collections::HashMap;
use std::hash::Hasher;

use twox_hash::XxHash64;

use crate::config::StrategyKind;

/// Semente fixa do hash: a codificação precisa ser estável entre processos.
const HASH_SEED: u64 = 0x6e61_6275;

/// Assinatura derivada de uma pergunta, comparável com a da consulta.
#[derive(Debug, Clone)]
pub enum Representation {
    Dense(Vec<f32>),
    Terms(HashMap<String, u32>),
}

/// Codificador escolhido na construção e aplicado uniformemente.
#[derive(Debug, Clone)]
pub struct Encoder {
    kind: StrategyKind,
    dim: usize,
}

impl Encoder {
    pub fn new(kind: StrategyKind, dim: usize) -> Self {
        // Dimensão zero inviabilizaria o hashing; 1 ainda respeita o contrato.
        Self { kind, dim: dim.max(1) }
    }

    pub fn kind(&self) -> StrategyKind {
        self.kind
    }

    pub fn encode(&self, text: &str) -> Representation {
        match self.kind {
            StrategyKind::Densa => Representation::Dense(self.embed(text)),
            StrategyKind::Termos => Representation::Terms(term_signature(text)),
        }
    }

    /// Score em [0, 1] entre a representação da consulta e a de um documento.
    /// Representações de estratégias diferentes nunca devem se encontrar aqui;
    /// se acontecer, o par vale 0 (caminho de recuperação, não pânico).
    pub fn score(&self, query: &Representation, doc: &Representation) -> f32 {
        match (query, doc) {
            (Representation::Dense(a), Representation::Dense(b)) => cosine(a, b),
            (Representation::Terms(a), Representation::Terms(b)) => weighted_jaccard(a, b),
            _ => 0.0,
        }
    }

    /// Projeta tokens e trigramas de caracteres em um vetor de dimensão fixa.
    /// Pesos não-negativos, logo o cosseno resultante fica em [0, 1].
    fn embed(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dim];
        for token in tokenize(text) {
            bump(&mut vector, &token);
            let chars: Vec<char> = token.chars().collect();
            for gram in chars.windows(3) {
                let gram: String = gram.iter().collect();
                bump(&mut vector, &gram);
            }
        }
        vector
    }
}

fn bump(vector: &mut [f32], feature: &str) {
    let mut hasher = XxHash64::with_seed(HASH_SEED);
    hasher.write(feature.as_bytes());
    let index = (hasher.finish() % vector.len() as u64) as usize;
    vector[index] += 1.0;
}

/// Tokenização comum: case-fold e quebra em separadores não alfanuméricos.
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Assinatura de termos: tokens com mais de 3 caracteres, contados.
/// O corte por tamanho é uma simplificação deliberada de stopwords,
/// não uma lista por idioma.
pub fn term_signature(text: &str) -> HashMap<String, u32> {
    let mut counts = HashMap::new();
    for token in tokenize(text) {
        if token.chars().count() <= 3 {
            continue;
        }
        *counts.entry(token).or_insert(0) += 1;
    }
    counts
}

/// Similaridade de cosseno; norma zero de qualquer lado vale 0, não erro.
fn cosine(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(0.0, 1.0)
}

/// Jaccard ponderado: soma dos mínimos sobre a união dos termos, dividida por
/// (Σ contagens da consulta + Σ contagens do documento − essa sobreposição).
/// Consulta sem termos após o filtro vale 0 (em vez de comparar com vazio).
fn weighted_jaccard(query: &HashMap<String, u32>, doc: &HashMap<String, u32>) -> f32 {
    let query_total: u32 = query.values().sum();
    if query_total == 0 {
        return 0.0;
    }
    let doc_total: u32 = doc.values().sum();

    let overlap: u32 = query
        .iter()
        .map(|(term, count)| doc.get(term).map_or(0, |d| (*count).min(*d)))
        .sum();

    let denominator = query_total + doc_total - overlap;
    if denominator == 0 {
        return 0.0;
    }
    overlap as f32 / denominator as f32
}
