use std::sync::Arc;
use uuid::Uuid;

use crate::domain::errors::CommandError;
use crate::messaging::{dispatch_committed, EventDispatcher};
use crate::persistence::Persistence;

use super::aggregate::Course;
use super::commands::CourseCommand;

// ============================================================================
// Course Command Handler
// ============================================================================

pub struct CourseCommandHandler {
    persistence: Arc<dyn Persistence>,
    dispatcher: Arc<dyn EventDispatcher>,
}

impl CourseCommandHandler {
    pub fn new(persistence: Arc<dyn Persistence>, dispatcher: Arc<dyn EventDispatcher>) -> Self {
        Self { persistence, dispatcher }
    }

    /// Handle a command and return the id of the affected course
    pub async fn handle(&self, command: CourseCommand) -> Result<Uuid, CommandError> {
        let command_name = command.name();
        tracing::info!(command = command_name, "Handling course command");

        let mut uow = self.persistence.begin().await?;

        let course_id = match command {
            CourseCommand::Register { name } => {
                // Course names are unique
                if uow.find_course_by_name(&name).await?.is_some() {
                    tracing::warn!(command = command_name, name = %name, "Course name already taken");
                    return Err(CommandError::conflict("course already exists."));
                }

                let course = Course::new(Uuid::new_v4(), name);
                let course_id = course.id;
                tracing::info!(course_id = %course_id, name = %course.name, "Registering course");
                uow.add_course(course);
                course_id
            }
            CourseCommand::Remove { course_id } => {
                let Some(course) = uow.find_course_by_id(course_id).await? else {
                    tracing::warn!(command = command_name, course_id = %course_id, "Course not found");
                    return Err(CommandError::not_found("Course doesn't exist."));
                };

                tracing::info!(course_id = %course_id, "Removing course");
                uow.remove_course(course);
                course_id
            }
        };

        let events = uow.commit().await?;
        dispatch_committed(self.dispatcher.as_ref(), events).await;

        Ok(course_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messaging::RecordingDispatcher;
    use crate::persistence::InMemoryStore;

    fn handler(store: &InMemoryStore) -> CourseCommandHandler {
        CourseCommandHandler::new(Arc::new(store.clone()), Arc::new(RecordingDispatcher::new()))
    }

    fn register(name: &str) -> CourseCommand {
        CourseCommand::Register { name: name.to_string() }
    }

    #[tokio::test]
    async fn test_register_new_course() {
        let store = InMemoryStore::new();

        let id = handler(&store).handle(register("Algebra")).await.unwrap();

        let mut uow = store.begin().await.unwrap();
        let course = uow.find_course_by_id(id).await.unwrap().unwrap();
        assert_eq!(course.name, "Algebra");
        assert!(!course.is_deleted);
    }

    #[tokio::test]
    async fn test_register_duplicate_name() {
        let store = InMemoryStore::new();
        let handler = handler(&store);
        handler.handle(register("Algebra")).await.unwrap();

        let err = handler.handle(register("Algebra")).await.unwrap_err();

        assert!(matches!(err, CommandError::Conflict(_)));
        assert_eq!(err.to_string(), "course already exists.");
        assert_eq!(store.state().lock().await.courses.len(), 1);
    }

    #[tokio::test]
    async fn test_name_match_is_exact() {
        let store = InMemoryStore::new();
        let handler = handler(&store);
        handler.handle(register("Algebra")).await.unwrap();

        assert!(handler.handle(register("algebra")).await.is_ok());
    }

    #[tokio::test]
    async fn test_remove_course_hides_it() {
        let store = InMemoryStore::new();
        let handler = handler(&store);
        let id = handler.handle(register("Algebra")).await.unwrap();

        assert_eq!(handler.handle(CourseCommand::Remove { course_id: id }).await.unwrap(), id);

        let mut uow = store.begin().await.unwrap();
        assert!(uow.find_course_by_id(id).await.unwrap().is_none());
        // The row is kept, only flagged
        assert!(store.state().lock().await.courses[0].is_deleted);
    }

    #[tokio::test]
    async fn test_removed_name_can_be_registered_again() {
        let store = InMemoryStore::new();
        let handler = handler(&store);
        let id = handler.handle(register("Algebra")).await.unwrap();
        handler.handle(CourseCommand::Remove { course_id: id }).await.unwrap();

        let again = handler.handle(register("Algebra")).await.unwrap();
        assert_ne!(again, id);
    }

    #[tokio::test]
    async fn test_remove_unknown_course() {
        let store = InMemoryStore::new();

        let err = handler(&store)
            .handle(CourseCommand::Remove { course_id: Uuid::new_v4() })
            .await
            .unwrap_err();

        assert!(matches!(err, CommandError::NotFound(_)));
        assert_eq!(err.to_string(), "Course doesn't exist.");
    }

    #[tokio::test]
    async fn test_remove_twice() {
        let store = InMemoryStore::new();
        let handler = handler(&store);
        let id = handler.handle(register("Algebra")).await.unwrap();
        handler.handle(CourseCommand::Remove { course_id: id }).await.unwrap();

        let err = handler.handle(CourseCommand::Remove { course_id: id }).await.unwrap_err();
        assert_eq!(err.to_string(), "Course doesn't exist.");
    }
}
