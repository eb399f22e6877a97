//! Taxonomia de erros do núcleo de recuperação.
//!
//! Só duas situações chegam ao chamador como `Err`:
//!   - falha de escrita ao persistir a base (`Persist`);
//!   - conteúdo irrecuperável ao carregar (`CorpusLoad`), que o `QaStore`
//!     converte internamente em corpus vazio + warning, nunca em pânico.
//!
//! "Nenhum resultado confiante" não é erro: o ranker aplica a política de
//! degradação determinística (melhor esforço) e o chamador decide pelo score.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NabuError {
    /// O arquivo da base não pôde ser lido ou decodificado.
    /// Recuperado localmente (corpus vazio); exposto apenas para observabilidade.
    #[error("falha ao carregar a base de Q&A em {}: {source:#}", path.display())]
    CorpusLoad { path: PathBuf, source: anyhow::Error },

    /// Falha de escrita ao persistir o corpus. O estado em memória já contém
    /// a alteração; cabe ao chamador reconciliar com o disco.
    #[error("falha ao persistir a base de Q&A em {}: {source:#}", path.display())]
    Persist { path: PathBuf, source: anyhow::Error },
}
