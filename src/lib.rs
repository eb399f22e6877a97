//! Núcleo de recuperação do Nabu, o assistente corporativo.
//!
//! Dada uma base curada de perguntas e respostas e uma consulta em texto
//! livre, o núcleo devolve os pares mais relevantes com um score de confiança
//! em [0, 1], de forma determinística e reprodutível. Front-end de chat e
//! geração por modelo de linguagem são colaboradores externos que consomem
//! esta interface.
//!
//! Construção típica, uma vez no início do processo:
//!
//! ```no_run
//! use nabu_rag::{AppConfig, Assistant, RagManager};
//!
//! let cfg = AppConfig::from_env().expect("configuração inválida");
//! let manager = RagManager::from_config(&cfg);
//! let assistant = Assistant::new(manager, &cfg);
//!
//! let reply = assistant.reply("Qual o horário de almoço?");
//! println!("{} (confiança {:.2})", reply.text, reply.similarity);
//! ```
//!
//! Concorrência: `reply`/`rank`/`context` tomam `&self` e não mutam nada;
//! `learn`/`add_and_reindex` tomam `&mut self` e reconstroem o índice por
//! completo. Hosts que compartilham o assistente entre threads o envolvem em
//! um `RwLock` — leitores nunca observam um índice reconstruído pela metade.

// Módulos da aplicação
pub mod assistant;
pub mod config;
pub mod error;
pub mod models;
pub mod rag;
pub mod similarity;
pub mod store;

pub use assistant::{Assistant, Reply};
pub use config::{AppConfig, StrategyKind};
pub use error::NabuError;
pub use models::{QaPair, QueryResult};
pub use rag::RagManager;
pub use similarity::{Encoder, Representation};
pub use store::QaStore;
