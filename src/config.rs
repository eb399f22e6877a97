//! Carga e gestão da configuração da aplicação (base de Q&A + ranking).

use std::env;

use anyhow::{anyhow, Context, Result};

/// Estratégia de representação usada para comparar pergunta e corpus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrategyKind {
    /// Vetor denso de dimensão fixa (feature hashing) comparado por cosseno.
    Densa,
    /// Assinatura de frequência de termos comparada por Jaccard ponderado.
    Termos,
}

impl StrategyKind {
    pub fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "densa" | "dense" => Ok(Self::Densa),
            "termos" | "terms" => Ok(Self::Termos),
            other => Err(anyhow!("Estratégia de similaridade não suportada: {other}")),
        }
    }
}

/// Configuração completa do núcleo de recuperação.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Caminho do arquivo JSON com os pares de pergunta e resposta.
    pub qa_file: String,
    pub strategy: StrategyKind,
    /// Dimensão do vetor do codificador denso.
    pub embedding_dim: usize,
    /// Quantidade de resultados retornados por consulta.
    pub top_k: usize,
    /// Score mínimo para um resultado sobreviver ao corte.
    pub min_score: f32,
    /// Limiar abaixo do qual o assistente pede para reformular a pergunta.
    pub reply_threshold: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            qa_file: "data/qa_database.json".to_string(),
            strategy: StrategyKind::Densa,
            embedding_dim: 256,
            top_k: 3,
            min_score: 0.1,
            reply_threshold: 0.2,
        }
    }
}

impl AppConfig {
    /// Carrega a configuração de variáveis de ambiente (usando .env se existir).
    /// Tudo tem default; valores numéricos inválidos são erro.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let qa_file = env::var("NABU_QA_FILE").unwrap_or(defaults.qa_file);

        let strategy = match env::var("NABU_STRATEGY") {
            Ok(s) => StrategyKind::from_str(&s)?,
            Err(_) => defaults.strategy,
        };

        let embedding_dim = parse_or("NABU_EMBEDDING_DIM", defaults.embedding_dim)?;
        let top_k = parse_or("NABU_TOP_K", defaults.top_k)?;
        let min_score = parse_or("NABU_MIN_SCORE", defaults.min_score)?;
        let reply_threshold = parse_or("NABU_REPLY_THRESHOLD", defaults.reply_threshold)?;

        if embedding_dim == 0 {
            return Err(anyhow!("NABU_EMBEDDING_DIM deve ser maior que zero"));
        }

        Ok(Self {
            qa_file,
            strategy,
            embedding_dim,
            top_k,
            min_score,
            reply_threshold,
        })
    }
}

fn parse_or<T: std::str::FromStr>(var: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Valor inválido em {var}: {raw:?}")),
        Err(_) => Ok(default),
    }
}
