//! Ranker de similaridade sobre o corpus de Q&A.
//!
//! Fluxo de uma consulta:
//!   1. A consulta é normalizada e codificada com a mesma estratégia usada
//!      para as perguntas do corpus.
//!   2. Cada representação armazenada recebe um score em [0, 1].
//!   3. Os `top_k` maiores sobrevivem ao corte por `min_score` e voltam em
//!      ordem decrescente, com empate resolvido pela ordem do corpus.
//!   4. Se ninguém sobrevive ao corte mas o corpus não está vazio, a política
//!      de degradação devolve o melhor colocado com seu score real (baixo),
//!      para que o chamador sempre tenha o que dizer ao usuário.

use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::error::NabuError;
use crate::models::QueryResult;
use crate::similarity::{Encoder, Representation};
use crate::store::QaStore;

/// Gerenciador de recuperação: dono do corpus e do cache de representações.
///
/// Invariante: `representations` tem sempre o mesmo comprimento e a mesma
/// correspondência de índices que `store.all()`. Toda mutação do corpus
/// dispara uma reconstrução completa (o rebuild é barato; atualização
/// incremental não é necessária).
#[derive(Debug)]
pub struct RagManager {
    store: QaStore,
    encoder: Encoder,
    representations: Vec<Representation>,
}

impl RagManager {
    /// Constrói o gerenciador a partir da configuração, carregando o corpus
    /// do disco e preparando as representações. Corpus vazio não é erro.
    pub fn from_config(cfg: &AppConfig) -> Self {
        let store = QaStore::load(&cfg.qa_file);
        Self::with_store(store, Encoder::new(cfg.strategy, cfg.embedding_dim))
    }

    pub fn with_store(store: QaStore, encoder: Encoder) -> Self {
        let mut manager = Self {
            store,
            encoder,
            representations: Vec::new(),
        };
        manager.rebuild();
        manager
    }

    /// Reconstrói o cache de representações para o corpus inteiro.
    fn rebuild(&mut self) {
        self.representations = self
            .store
            .all()
            .iter()
            .map(|pair| self.encoder.encode(&pair.question))
            .collect();
        debug!(
            "Representações reconstruídas: {} perguntas indexadas.",
            self.representations.len()
        );
    }

    /// Retorna os melhores resultados para a consulta, em ordem decrescente
    /// de similaridade.
    ///
    /// Sobrevivem ao corte apenas scores estritamente maiores que `min_score`.
    /// Com corpus vazio o retorno é vazio; com corpus não vazio e nenhum
    /// sobrevivente, aplica-se a política de degradação (melhor esforço).
    pub fn rank(&self, query: &str, top_k: usize, min_score: f32) -> Vec<QueryResult> {
        if self.store.is_empty() || top_k == 0 {
            return Vec::new();
        }

        let scores = self.score_all(query);

        // Ordenação estável por score decrescente: empates ficam na ordem do
        // corpus (índice menor vence).
        let mut ranked: Vec<(usize, f32)> = scores.into_iter().enumerate().collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        let survivors: Vec<QueryResult> = ranked
            .iter()
            .take(top_k)
            .filter(|(_, score)| *score > min_score)
            .map(|(idx, score)| QueryResult::from_pair(&self.store.all()[*idx], *score))
            .collect();

        if survivors.is_empty() {
            // Política de degradação: devolve o melhor colocado global com o
            // score real, e o chamador decide se pede para reformular.
            let (best_idx, best_score) = ranked[0];
            debug!("Nenhum resultado acima de {min_score}; devolvendo melhor esforço ({best_score:.3}).");
            return vec![QueryResult::from_pair(&self.store.all()[best_idx], best_score)];
        }

        survivors
    }

    /// Codifica a consulta e pontua contra todas as representações do corpus.
    /// Scores não finitos (representação corrompida) valem 0, com warning.
    fn score_all(&self, query: &str) -> Vec<f32> {
        let query_repr = self.encoder.encode(query);
        self.representations
            .iter()
            .enumerate()
            .map(|(idx, repr)| {
                let score = self.encoder.score(&query_repr, repr);
                if score.is_finite() {
                    score
                } else {
                    warn!("Score não finito na posição {idx}; tratado como 0.");
                    0.0
                }
            })
            .collect()
    }

    /// Acrescenta um par ao corpus e reconstrói as representações.
    ///
    /// A falha de persistência é devolvida ao chamador, mas memória e índice
    /// permanecem consistentes com o par já incluído.
    pub fn add_and_reindex(
        &mut self,
        question: impl Into<String>,
        answer: impl Into<String>,
        category: impl Into<String>,
    ) -> Result<(), NabuError> {
        let result = self.store.append(question, answer, category);
        self.rebuild();
        result
    }

    /// Monta o bloco de contexto textual com os melhores resultados, no
    /// formato consumido pelo gerador externo.
    pub fn context_block(&self, query: &str, top_k: usize, min_score: f32) -> String {
        let results = self.rank(query, top_k, min_score);
        let mut context = String::new();
        for result in &results {
            context.push_str(&format!(
                "Pergunta: {}\nResposta: {}\n\n",
                result.question, result.answer
            ));
        }
        context.trim().to_string()
    }

    pub fn store(&self) -> &QaStore {
        &self.store
    }

    pub fn encoder(&self) -> &Encoder {
        &self.encoder
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StrategyKind;
    use crate::models::QaPair;

    fn corpus() -> Vec<QaPair> {
        vec![
            QaPair::new("Qual o horário de almoço?", "12h às 13h", "RH"),
            QaPair::new(
                "Como solicitar reembolso de despesas?",
                "Pelo formulário no portal financeiro",
                "financeiro",
            ),
            QaPair::new(
                "Qual a política de home office?",
                "Até 3 dias por semana, com acordo do gestor",
                "RH",
            ),
        ]
    }

    fn manager(kind: StrategyKind) -> RagManager {
        let store = QaStore::with_pairs("unused.json", corpus());
        RagManager::with_store(store, Encoder::new(kind, 256))
    }

    #[test]
    fn scores_vem_em_ordem_nao_crescente() {
        for kind in [StrategyKind::Densa, StrategyKind::Termos] {
            let manager = manager(kind);
            let results = manager.rank("horário de almoço", 3, 0.0);
            for pair in results.windows(2) {
                assert!(pair[0].similarity >= pair[1].similarity);
            }
        }
    }

    #[test]
    fn corpus_vazio_retorna_vazio_sem_panico() {
        let store = QaStore::with_pairs("unused.json", Vec::new());
        let manager = RagManager::with_store(store, Encoder::new(StrategyKind::Termos, 256));
        assert!(manager.rank("qualquer pergunta", 3, 0.1).is_empty());
    }

    #[test]
    fn consulta_identica_e_o_maximo_da_estrategia() {
        let manager = manager(StrategyKind::Termos);
        let results = manager.rank("Qual o horário de almoço?", 1, 0.0);
        assert!((results[0].similarity - 1.0).abs() < 1e-6);
        assert_eq!(results[0].answer, "12h às 13h");
    }

    #[test]
    fn cenario_horario_de_almoco() {
        let termos = manager(StrategyKind::Termos);
        let top = &termos.rank("horário de almoço", 3, 0.0)[0];
        assert_eq!(top.answer, "12h às 13h");
        assert!(top.similarity > 0.1);

        let densa = manager(StrategyKind::Densa);
        let top = &densa.rank("horário de almoço", 3, 0.0)[0];
        assert_eq!(top.answer, "12h às 13h");
        assert!(top.similarity > 0.3);
    }

    #[test]
    fn sem_termos_em_comum_aciona_melhor_esforco() {
        let manager = manager(StrategyKind::Termos);
        let results = manager.rank("estacionamento para visitantes", 3, 0.1);
        // Todos os scores são 0; a degradação devolve um único melhor esforço.
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].similarity, 0.0);
    }

    #[test]
    fn append_e_consulta_retorna_o_novo_par_no_topo() {
        let dir = tempfile::tempdir().unwrap();
        let store = QaStore::with_pairs(dir.path().join("base.json"), corpus());
        let mut manager = RagManager::with_store(store, Encoder::new(StrategyKind::Termos, 256));

        manager
            .add_and_reindex("Como solicitar férias?", "Via portal RH", "RH")
            .unwrap();

        let results = manager.rank("solicitar férias", 3, 0.1);
        assert_eq!(results[0].answer, "Via portal RH");
        assert!(results[0].similarity > 0.1);
    }

    #[test]
    fn empate_mantem_a_ordem_do_corpus() {
        let store = QaStore::with_pairs(
            "unused.json",
            vec![
                QaPair::new("política de viagens corporativas", "Resposta A", "geral"),
                QaPair::new("política de viagens corporativas", "Resposta B", "geral"),
            ],
        );
        let manager = RagManager::with_store(store, Encoder::new(StrategyKind::Termos, 256));
        let results = manager.rank("política de viagens", 2, 0.0);
        assert_eq!(results[0].answer, "Resposta A");
        assert_eq!(results[1].answer, "Resposta B");
    }

    #[test]
    fn bloco_de_contexto_concatena_e_apara() {
        let manager = manager(StrategyKind::Termos);
        let block = manager.context_block("horário de almoço", 2, 0.0);
        assert!(block.starts_with("Pergunta: Qual o horário de almoço?"));
        assert!(block.contains("Resposta: 12h às 13h"));
        assert!(!block.ends_with('\n'));
    }
}
