//! Camada de atendimento: a interface que o front-end de chat consome.
//!
//! Contrato com o colaborador externo: toda consulta recebe um texto de
//! resposta não vazio, acompanhado do score numérico, para que o host aplique
//! o seu próprio limiar de confiança antes de confiar no melhor resultado.

use tracing::info;

use crate::config::AppConfig;
use crate::error::NabuError;
use crate::models::QueryResult;
use crate::rag::RagManager;

/// Resposta do assistente: texto pronto para exibição + confiança do match.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    pub similarity: f32,
}

/// Mensagem quando a base não tem nada a oferecer.
pub const NO_MATCH_REPLY: &str = "Desculpe, não encontrei informações específicas sobre sua \
     pergunta. Pode reformular ou perguntar sobre outro tema?";

/// Mensagem quando o melhor resultado fica abaixo do limiar de confiança.
pub const REPHRASE_REPLY: &str =
    "Sua pergunta não está muito clara. Pode reformular ou ser mais específico?";

/// Mensagem de recuperação para falhas inesperadas do host (ex.: o gerador
/// externo indisponível). O núcleo em si nunca a produz espontaneamente.
pub const TECHNICAL_DIFFICULTIES_REPLY: &str = "Desculpe, estou enfrentando dificuldades \
     técnicas. Por favor, tente novamente mais tarde ou reformule sua pergunta.";

/// Assistente: envolve o ranker com os limiares de resposta configurados.
#[derive(Debug)]
pub struct Assistant {
    manager: RagManager,
    top_k: usize,
    min_score: f32,
    reply_threshold: f32,
}

impl Assistant {
    pub fn new(manager: RagManager, cfg: &AppConfig) -> Self {
        Self {
            manager,
            top_k: cfg.top_k,
            min_score: cfg.min_score,
            reply_threshold: cfg.reply_threshold,
        }
    }

    /// Responde uma pergunta do usuário. O texto retornado nunca é vazio.
    pub fn reply(&self, query: &str) -> Reply {
        let results = self.manager.rank(query, self.top_k, self.min_score);

        let Some(best) = results.first() else {
            info!("Corpus vazio ou sem resultados para a consulta.");
            return Reply {
                text: NO_MATCH_REPLY.to_string(),
                similarity: 0.0,
            };
        };

        if best.similarity < self.reply_threshold {
            info!(
                "Melhor resultado abaixo do limiar ({:.3} < {:.3}); pedindo reformulação.",
                best.similarity, self.reply_threshold
            );
            return Reply {
                text: REPHRASE_REPLY.to_string(),
                similarity: best.similarity,
            };
        }

        Reply {
            text: best.answer.clone(),
            similarity: best.similarity,
        }
    }

    /// Lista ranqueada crua, para hosts que preferem decidir sozinhos.
    pub fn ranked(&self, query: &str) -> Vec<QueryResult> {
        self.manager.rank(query, self.top_k, self.min_score)
    }

    /// Bloco de contexto textual para alimentar um gerador externo.
    pub fn context(&self, query: &str) -> String {
        self.manager.context_block(query, self.top_k, self.min_score)
    }

    /// Ensina um novo par ao assistente (acréscimo + reindexação completa).
    pub fn learn(
        &mut self,
        question: impl Into<String>,
        answer: impl Into<String>,
        category: impl Into<String>,
    ) -> Result<(), NabuError> {
        self.manager.add_and_reindex(question, answer, category)
    }

    /// Resposta fixa de recuperação para o host usar quando algo fora do
    /// núcleo falhar.
    pub fn technical_difficulties() -> Reply {
        Reply {
            text: TECHNICAL_DIFFICULTIES_REPLY.to_string(),
            similarity: 0.0,
        }
    }

    pub fn manager(&self) -> &RagManager {
        &self.manager
    }
}
