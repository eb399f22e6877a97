//! Modelos de domínio (pares de pergunta/resposta e resultados de consulta).

use serde::{Deserialize, Serialize};

fn default_category() -> String {
    "geral".to_string()
}

/// Um par pergunta/resposta da base de conhecimento.
///
/// A identidade é posicional: o índice na sequência do corpus faz o papel de
/// chave durante a vida do processo. Não há campo de ID explícito.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
    /// Categoria do par (ex.: "RH", "processos"). Ausente no arquivo → "geral".
    #[serde(default = "default_category")]
    pub category: String,
}

impl QaPair {
    pub fn new(
        question: impl Into<String>,
        answer: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            category: category.into(),
        }
    }
}

/// Resultado de uma consulta: o par recuperado com sua similaridade em [0, 1].
/// Efêmero, produzido a cada consulta e nunca persistido.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    pub question: String,
    pub answer: String,
    pub category: String,
    pub similarity: f32,
}

impl QueryResult {
    pub(crate) fn from_pair(pair: &QaPair, similarity: f32) -> Self {
        Self {
            question: pair.question.clone(),
            answer: pair.answer.clone(),
            category: pair.category.clone(),
            similarity,
        }
    }
}
