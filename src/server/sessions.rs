// SPDX-License-Identifier: MIT

//! In-memory questionnaire sessions, one independent `Questionnaire` each

use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{FemiverseError, Result};
use crate::symptom::{Advance, AnswerSet, Assessment, Question, Questionnaire, RuleBook};

/// What a client needs to render a session
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub id: Uuid,
    pub index: usize,
    pub total: usize,
    pub progress: u8,
    pub question: Option<Question>,
    pub answers: AnswerSet,
    pub complete: bool,
    pub result: Option<Assessment>,
}

impl SessionView {
    pub fn of(id: Uuid, q: &Questionnaire) -> Self {
        Self {
            id,
            index: q.index(),
            total: q.sequence().len(),
            progress: q.progress(),
            question: q.current().cloned(),
            answers: q.answers().clone(),
            complete: q.is_complete(),
            result: q.result().cloned(),
        }
    }
}

#[derive(Clone)]
pub struct SessionStore {
    rules: Arc<RuleBook>,
    sessions: Arc<RwLock<HashMap<Uuid, Questionnaire>>>,
}

impl SessionStore {
    pub fn new(rules: Arc<RuleBook>) -> Self {
        Self {
            rules,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn rules(&self) -> &RuleBook {
        &self.rules
    }

    /// Open a fresh session
    pub async fn create(&self) -> SessionView {
        let id = Uuid::new_v4();
        let questionnaire = Questionnaire::new(self.rules.clone());
        let view = SessionView::of(id, &questionnaire);
        self.sessions.write().await.insert(id, questionnaire);
        log::info!("Opened questionnaire session {}", id);
        view
    }

    pub async fn view(&self, id: Uuid) -> Result<SessionView> {
        let sessions = self.sessions.read().await;
        let q = sessions
            .get(&id)
            .ok_or(FemiverseError::SessionNotFound(id))?;
        Ok(SessionView::of(id, q))
    }

    /// Run `f` against one session under the write lock
    pub async fn update<F, R>(&self, id: Uuid, f: F) -> Result<R>
    where
        F: FnOnce(&mut Questionnaire) -> Result<R>,
    {
        let mut sessions = self.sessions.write().await;
        let q = sessions
            .get_mut(&id)
            .ok_or(FemiverseError::SessionNotFound(id))?;
        f(q)
    }

    /// Advance one session; a finished session is dropped from the store
    ///
    /// The returned view is the last one the session will have.
    pub async fn advance(&self, id: Uuid) -> Result<(Advance, SessionView)> {
        let mut sessions = self.sessions.write().await;
        let q = sessions
            .get_mut(&id)
            .ok_or(FemiverseError::SessionNotFound(id))?;
        let outcome = q.advance();
        let view = SessionView::of(id, q);
        if let Advance::Finished { result } = &outcome {
            sessions.remove(&id);
            log::info!(
                "Questionnaire session {} finished with '{}', closed",
                id,
                result.condition
            );
        }
        Ok((outcome, view))
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&id).is_some();
        if removed {
            log::info!("Closed questionnaire session {}", id);
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symptom::question::{AGE_GROUP, PRIMARY_CONCERN};
    use crate::symptom::AnswerValue;

    fn store() -> SessionStore {
        SessionStore::new(Arc::new(RuleBook::builtin()))
    }

    #[tokio::test]
    async fn test_create_and_view() {
        let store = store();
        let created = store.create().await;
        assert_eq!(created.total, 2);
        assert_eq!(created.question.as_ref().unwrap().id, AGE_GROUP);

        let viewed = store.view(created.id).await.unwrap();
        assert_eq!(viewed.id, created.id);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let store = store();
        let a = store.create().await.id;
        let b = store.create().await.id;

        store
            .update(a, |q| q.record_answer(AGE_GROUP, AnswerValue::choice("18-25")))
            .await
            .unwrap();

        assert_eq!(store.view(a).await.unwrap().answers.len(), 1);
        assert!(store.view(b).await.unwrap().answers.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_session() {
        let store = store();
        let id = Uuid::new_v4();
        assert!(matches!(
            store.view(id).await.unwrap_err(),
            FemiverseError::SessionNotFound(missing) if missing == id
        ));
        assert!(!store.remove(id).await);
    }

    #[tokio::test]
    async fn test_remove() {
        let store = store();
        let id = store.create().await.id;
        assert!(store.remove(id).await);
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_finished_session_is_evicted() {
        let store = store();
        let id = store.create().await.id;
        store
            .update(id, |q| q.record_answer(AGE_GROUP, AnswerValue::choice("36-45")))
            .await
            .unwrap();
        let (outcome, _) = store.advance(id).await.unwrap();
        assert_eq!(outcome, Advance::Next { index: 1 });

        store
            .update(id, |q| {
                q.record_answer(PRIMARY_CONCERN, AnswerValue::choice("Other symptoms"))
            })
            .await
            .unwrap();
        let (outcome, view) = store.advance(id).await.unwrap();
        assert!(matches!(outcome, Advance::Finished { .. }));
        assert!(view.complete);
        assert_eq!(view.result.unwrap().confidence, 50);

        assert_eq!(store.len().await, 0);
        assert!(matches!(
            store.advance(id).await.unwrap_err(),
            FemiverseError::SessionNotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_blocked_advance_keeps_session() {
        let store = store();
        let id = store.create().await.id;
        let (outcome, _) = store.advance(id).await.unwrap();
        assert_eq!(outcome, Advance::Blocked);
        assert_eq!(store.len().await, 1);
    }
}
