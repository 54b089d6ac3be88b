use async_trait::async_trait;

use crate::persistence::store::soft_delete::is_live;
use crate::persistence::{InMemoryStore, PersistenceError};
use super::{CourseFilter, CourseView, ReadModel, StudentFilter, StudentView};

#[async_trait]
impl ReadModel for InMemoryStore {
    async fn list_students(&self, filter: &StudentFilter) -> Result<Vec<StudentView>, PersistenceError> {
        self.check_available()?;
        let state = self.state().lock().await;

        let mut students: Vec<StudentView> = state
            .students
            .iter()
            .filter(|s| is_live(*s))
            .filter(|s| filter.email.as_deref().map_or(true, |email| s.email().as_str() == email))
            .map(|s| state.visible_student(s))
            .filter(|s| {
                filter
                    .course_id
                    .map_or(true, |course_id| s.enrollments().iter().any(|e| e.course().id == course_id))
            })
            .map(|s| StudentView::from(&s))
            .collect();

        students.sort_by(|a, b| {
            (&a.last_name, &a.first_name, a.id).cmp(&(&b.last_name, &b.first_name, b.id))
        });
        Ok(students)
    }

    async fn list_courses(&self, filter: &CourseFilter) -> Result<Vec<CourseView>, PersistenceError> {
        self.check_available()?;
        let state = self.state().lock().await;
        let needle = filter.name_contains.as_deref().map(str::to_lowercase);

        let mut courses: Vec<CourseView> = state
            .courses
            .iter()
            .filter(|c| is_live(*c))
            .filter(|c| needle.as_deref().map_or(true, |n| c.name.to_lowercase().contains(n)))
            .map(CourseView::from)
            .collect();

        courses.sort_by(|a, b| (&a.name, a.id).cmp(&(&b.name, b.id)));
        Ok(courses)
    }
}
