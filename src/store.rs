//! Armazenamento do corpus de Q&A: carga tolerante, acréscimo e persistência.
//!
//! Contrato de escrita: o arquivo sempre é serializado por inteiro como um
//! objeto `{"qa_pairs": [...]}` em UTF-8, com texto não-ASCII preservado.
//! Na leitura, tanto esse envelope quanto um array puro no topo são aceitos.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::NabuError;
use crate::models::QaPair;

/// Formatos aceitos no disco: envelope canônico ou array legado.
#[derive(Deserialize)]
#[serde(untagged)]
enum QaFile {
    Wrapped { qa_pairs: Vec<QaPair> },
    Bare(Vec<QaPair>),
}

impl QaFile {
    fn into_pairs(self) -> Vec<QaPair> {
        match self {
            Self::Wrapped { qa_pairs } => qa_pairs,
            Self::Bare(pairs) => pairs,
        }
    }
}

/// Envelope canônico de escrita.
#[derive(Serialize)]
struct QaFileOut<'a> {
    qa_pairs: &'a [QaPair],
}

/// Dono da lista autoritativa de pares e do seu arquivo de backup.
#[derive(Debug)]
pub struct QaStore {
    path: PathBuf,
    pairs: Vec<QaPair>,
}

impl QaStore {
    /// Carrega a base do disco. Arquivo ausente ou malformado degrada para
    /// corpus vazio com warning; nunca é fatal.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let pairs = match Self::read_pairs(&path) {
            Ok(pairs) => {
                debug!(
                    "Base de Q&A carregada de {}: {} pares.",
                    path.display(),
                    pairs.len()
                );
                pairs
            }
            Err(err) => {
                warn!("{err}; continuando com corpus vazio.");
                Vec::new()
            }
        };
        Self { path, pairs }
    }

    /// Constrói um store em memória já populado (útil em testes e hosts que
    /// carregam o corpus por outro caminho).
    pub fn with_pairs(path: impl Into<PathBuf>, pairs: Vec<QaPair>) -> Self {
        Self {
            path: path.into(),
            pairs,
        }
    }

    fn read_pairs(path: &Path) -> Result<Vec<QaPair>, NabuError> {
        if !path.exists() {
            return Err(NabuError::CorpusLoad {
                path: path.to_path_buf(),
                source: anyhow::anyhow!("arquivo não encontrado"),
            });
        }

        let raw = fs::read_to_string(path).map_err(|e| NabuError::CorpusLoad {
            path: path.to_path_buf(),
            source: anyhow::Error::new(e).context("erro de leitura"),
        })?;

        let parsed: QaFile = serde_json::from_str(&raw).map_err(|e| NabuError::CorpusLoad {
            path: path.to_path_buf(),
            source: anyhow::Error::new(e).context("JSON inválido"),
        })?;

        Ok(parsed.into_pairs())
    }

    /// Acrescenta um par e persiste o corpus inteiro. Em falha de escrita, a
    /// memória mantém o par e o erro é devolvido ao chamador.
    pub fn append(
        &mut self,
        question: impl Into<String>,
        answer: impl Into<String>,
        category: impl Into<String>,
    ) -> Result<(), NabuError> {
        self.pairs
            .push(QaPair::new(question, answer, category));
        self.persist()
    }

    /// Reescreve o arquivo com o snapshot completo do corpus.
    pub fn persist(&self) -> Result<(), NabuError> {
        let write = || -> anyhow::Result<()> {
            if let Some(parent) = self.path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)
                        .with_context(|| format!("criando diretório {}", parent.display()))?;
                }
            }
            let out = QaFileOut {
                qa_pairs: &self.pairs,
            };
            let json = serde_json::to_string_pretty(&out).context("serializando corpus")?;
            fs::write(&self.path, json)
                .with_context(|| format!("gravando {}", self.path.display()))?;
            Ok(())
        };

        write().map_err(|source| NabuError::Persist {
            path: self.path.clone(),
            source,
        })
    }

    /// Acesso somente leitura à sequência ordenada de pares.
    pub fn all(&self) -> &[QaPair] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn arquivo_ausente_degrada_para_vazio() {
        let dir = tempdir().unwrap();
        let store = QaStore::load(dir.path().join("nao_existe.json"));
        assert!(store.is_empty());
    }

    #[test]
    fn json_malformado_degrada_para_vazio() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("quebrado.json");
        fs::write(&path, "{ qa_pairs: [").unwrap();
        let store = QaStore::load(&path);
        assert!(store.is_empty());
    }

    #[test]
    fn aceita_envelope_e_array_puro() {
        let dir = tempdir().unwrap();

        let wrapped = dir.path().join("envelope.json");
        fs::write(
            &wrapped,
            r#"{"qa_pairs":[{"question":"q1","answer":"a1","category":"RH"}]}"#,
        )
        .unwrap();

        let bare = dir.path().join("array.json");
        fs::write(&bare, r#"[{"question":"q1","answer":"a1","category":"RH"}]"#).unwrap();

        let from_wrapped = QaStore::load(&wrapped);
        let from_bare = QaStore::load(&bare);
        assert_eq!(from_wrapped.all(), from_bare.all());
        assert_eq!(from_wrapped.len(), 1);
    }

    #[test]
    fn append_persiste_envelope_com_qa_pairs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("base.json");
        let mut store = QaStore::load(&path);
        store
            .append("Como solicitar férias?", "Via portal RH", "RH")
            .unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(value.get("qa_pairs").is_some());
        // Texto acentuado gravado como UTF-8 literal, sem escapes.
        assert!(raw.contains("férias"));
    }

    #[test]
    fn roundtrip_preserva_ordem_e_acentos() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("base.json");

        let mut store = QaStore::load(&path);
        store
            .append("Qual o horário de almoço?", "12h às 13h", "RH")
            .unwrap();
        store
            .append("Onde fica a recepção?", "Térreo, bloco A", "geral")
            .unwrap();

        let reloaded = QaStore::load(&path);
        assert_eq!(reloaded.all(), store.all());
        assert_eq!(reloaded.all()[0].answer, "12h às 13h");
    }

    #[test]
    fn falha_de_escrita_mantem_memoria() {
        let dir = tempdir().unwrap();
        // O caminho aponta para um diretório: a escrita falha, o par fica.
        let mut store = QaStore::with_pairs(dir.path(), Vec::new());
        let result = store.append("q", "a", "geral");
        assert!(matches!(result, Err(NabuError::Persist { .. })));
        assert_eq!(store.len(), 1);
    }
}
