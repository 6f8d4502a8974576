use std::sync::Arc;

use axum::http::StatusCode;

use crate::database::manager::DatabaseError;
use crate::database::models::person::{Person, PersonDraft};
use crate::database::repository::PersonRepository;

/// Result of a person operation, in HTTP terms
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersonOutcome {
    Found(Person),
    Created(Person),
    Updated(Person),
    Deleted(i32),
    NotFound(i32),
}

impl PersonOutcome {
    pub fn status_code(&self) -> StatusCode {
        match self {
            PersonOutcome::Found(_) | PersonOutcome::Updated(_) | PersonOutcome::Deleted(_) => {
                StatusCode::OK
            }
            PersonOutcome::Created(_) => StatusCode::CREATED,
            PersonOutcome::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    /// Plain-text body for outcomes that carry no record
    pub fn message(&self) -> Option<String> {
        match self {
            PersonOutcome::Deleted(id) => Some(format!("deleted person with Id: {}", id)),
            PersonOutcome::NotFound(id) => Some(format!("Cannot find Person with id: {}", id)),
            _ => None,
        }
    }
}

#[derive(Clone)]
pub struct PersonService {
    repository: Arc<dyn PersonRepository>,
}

impl PersonService {
    pub fn new(repository: Arc<dyn PersonRepository>) -> Self {
        Self { repository }
    }

    pub async fn get_person(&self, id: i32) -> Result<PersonOutcome, DatabaseError> {
        Ok(match self.repository.find_by_id(id).await? {
            Some(person) => PersonOutcome::Found(person),
            None => PersonOutcome::NotFound(id),
        })
    }

    /// Upsert: overwrites when `draft.id` names an existing record
    /// (reported as updated), otherwise inserts (reported as created).
    pub async fn post_person(&self, draft: PersonDraft) -> Result<PersonOutcome, DatabaseError> {
        let (saved, overwritten) = self.repository.save_and_flush(draft).await?;

        if overwritten {
            tracing::info!("Updated person {}", saved.id);
            Ok(PersonOutcome::Updated(saved))
        } else {
            tracing::info!("Created person {}", saved.id);
            Ok(PersonOutcome::Created(saved))
        }
    }

    pub async fn delete_person(&self, id: i32) -> Result<PersonOutcome, DatabaseError> {
        match self.repository.find_by_id(id).await? {
            Some(person) => {
                self.repository.delete(&person).await?;
                tracing::info!("Deleted person {}", id);
                Ok(PersonOutcome::Deleted(id))
            }
            None => Ok(PersonOutcome::NotFound(id)),
        }
    }

    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        self.repository.health_check().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use crate::database::manager::DatabaseManager;

    async fn service() -> PersonService {
        let config = DatabaseConfig {
            url: Some("sqlite::memory:".to_string()),
            max_connections: 1,
            connection_timeout: 5,
        };
        PersonService::new(DatabaseManager::connect(&config).await.unwrap())
    }

    fn ada(id: Option<i32>) -> PersonDraft {
        PersonDraft {
            id,
            first_name: "Ada".to_string(),
            last_name: Some("Lovelace".to_string()),
            phone_number: Some("1234567890".to_string()),
        }
    }

    #[tokio::test]
    async fn post_without_id_creates() {
        let service = service().await;
        let outcome = service.post_person(ada(None)).await.unwrap();

        let PersonOutcome::Created(person) = &outcome else {
            panic!("expected Created, got {:?}", outcome);
        };
        assert_eq!(outcome.status_code(), StatusCode::CREATED);
        assert_eq!(person.first_name, "Ada");
        assert_eq!(person.last_name.as_deref(), Some("Lovelace"));
        assert_eq!(person.phone_number.as_deref(), Some("1234567890"));
    }

    #[tokio::test]
    async fn post_with_existing_id_updates() {
        let service = service().await;
        let PersonOutcome::Created(created) = service.post_person(ada(None)).await.unwrap() else {
            panic!("expected Created");
        };

        let mut replacement = ada(Some(created.id));
        replacement.first_name = "Augusta".to_string();
        let outcome = service.post_person(replacement).await.unwrap();

        assert_eq!(outcome.status_code(), StatusCode::OK);
        assert_eq!(
            outcome,
            PersonOutcome::Updated(Person {
                id: created.id,
                first_name: "Augusta".to_string(),
                last_name: Some("Lovelace".to_string()),
                phone_number: Some("1234567890".to_string()),
            })
        );
    }

    #[tokio::test]
    async fn post_with_unknown_id_creates() {
        let service = service().await;
        let outcome = service.post_person(ada(Some(999))).await.unwrap();
        assert_eq!(outcome.status_code(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn post_with_deleted_id_creates() {
        let service = service().await;
        let PersonOutcome::Created(created) = service.post_person(ada(None)).await.unwrap() else {
            panic!("expected Created");
        };
        service.delete_person(created.id).await.unwrap();

        let outcome = service.post_person(ada(Some(created.id))).await.unwrap();
        assert_eq!(outcome.status_code(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn get_missing_reports_id() {
        let service = service().await;
        let outcome = service.get_person(31337).await.unwrap();
        assert_eq!(outcome, PersonOutcome::NotFound(31337));
        assert_eq!(outcome.message().unwrap(), "Cannot find Person with id: 31337");
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let service = service().await;
        let PersonOutcome::Created(created) = service.post_person(ada(None)).await.unwrap() else {
            panic!("expected Created");
        };

        let deleted = service.delete_person(created.id).await.unwrap();
        assert_eq!(deleted, PersonOutcome::Deleted(created.id));
        assert_eq!(
            deleted.message().unwrap(),
            format!("deleted person with Id: {}", created.id)
        );

        assert_eq!(
            service.get_person(created.id).await.unwrap(),
            PersonOutcome::NotFound(created.id)
        );
        assert_eq!(
            service.delete_person(created.id).await.unwrap(),
            PersonOutcome::NotFound(created.id)
        );
    }
}
