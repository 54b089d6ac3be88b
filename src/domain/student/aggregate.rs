use uuid::Uuid;

use crate::domain::course::Course;
use crate::persistence::core::{AggregateRoot, HasDomainEvents, SoftDeletable};
use super::errors::StudentError;
use super::events::{StudentEmailChanged, StudentEvent};
use super::value_objects::{Email, Name};

// ============================================================================
// Student Aggregate - Business Logic
// ============================================================================
//
// A student comes into existence by enrolling in a first course. Later
// disenrollment may leave the enrollment list empty; the student stays.
//
// Enrollment changes since create or restore are tracked so the store writes
// only the rows this unit of work touched.
//
// ============================================================================

/// Link between one student and one course
#[derive(Debug, Clone, PartialEq)]
pub struct Enrollment {
    id: Uuid,
    student_id: Uuid,
    course: Course,
}

impl Enrollment {
    fn new(student_id: Uuid, course: Course) -> Self {
        Self {
            id: Uuid::new_v4(),
            student_id,
            course,
        }
    }

    /// Rebuild a stored enrollment
    pub fn restore(id: Uuid, student_id: Uuid, course: Course) -> Self {
        Self { id, student_id, course }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn student_id(&self) -> Uuid {
        self.student_id
    }

    pub fn course(&self) -> &Course {
        &self.course
    }
}

#[derive(Debug, Clone)]
pub struct Student {
    id: Uuid,
    name: Name,
    email: Email,
    enrollments: Vec<Enrollment>,
    is_deleted: bool,
    events: Vec<StudentEvent>,
    added: Vec<Uuid>,
    removed: Vec<Uuid>,
}

impl Student {
    /// Create a student enrolled in `initial_course`
    pub fn create(id: Uuid, name: Name, email: Email, initial_course: Course) -> Self {
        let enrollment = Enrollment::new(id, initial_course);
        Self {
            id,
            name,
            email,
            added: vec![enrollment.id],
            enrollments: vec![enrollment],
            is_deleted: false,
            events: Vec::new(),
            removed: Vec::new(),
        }
    }

    /// Rebuild a stored student. Carries no pending events.
    pub fn restore(
        id: Uuid,
        name: Name,
        email: Email,
        enrollments: Vec<Enrollment>,
        is_deleted: bool,
    ) -> Self {
        Self {
            id,
            name,
            email,
            enrollments,
            is_deleted,
            events: Vec::new(),
            added: Vec::new(),
            removed: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn enrollments(&self) -> &[Enrollment] {
        &self.enrollments
    }

    /// Enrollments made since the student was created or loaded
    pub fn added_enrollments(&self) -> impl Iterator<Item = &Enrollment> {
        self.enrollments.iter().filter(|e| self.added.contains(&e.id))
    }

    /// Ids of loaded enrollments dropped since
    pub fn removed_enrollments(&self) -> &[Uuid] {
        &self.removed
    }

    pub fn is_enrolled_in(&self, course: &Course) -> bool {
        self.enrollments.iter().any(|e| e.course == *course)
    }

    pub fn enroll_in(&mut self, course: &Course) -> Result<(), StudentError> {
        if self.is_enrolled_in(course) {
            return Err(StudentError::AlreadyEnrolled(course.name.clone()));
        }

        let enrollment = Enrollment::new(self.id, course.clone());
        self.added.push(enrollment.id);
        self.enrollments.push(enrollment);
        Ok(())
    }

    pub fn disenroll(&mut self, course: &Course) -> Result<(), StudentError> {
        let position = self
            .enrollments
            .iter()
            .position(|e| e.course == *course)
            .ok_or_else(|| StudentError::NotEnrolled(course.name.clone()))?;

        let dropped = self.enrollments.remove(position);
        match self.added.iter().position(|id| *id == dropped.id) {
            Some(index) => {
                self.added.remove(index);
            }
            None => self.removed.push(dropped.id),
        }
        Ok(())
    }

    /// Replace name and email, queueing `StudentEmailChanged` when the
    /// email differs from the current one
    pub fn edit_personal_info(
        &mut self,
        name: Option<Name>,
        email: Option<Email>,
    ) -> Result<(), StudentError> {
        let name = name.ok_or(StudentError::EmptyName)?;
        let email = email.ok_or(StudentError::EmptyEmail)?;

        if self.email != email {
            self.events.push(StudentEvent::EmailChanged(StudentEmailChanged {
                student_id: self.id,
                new_email: email.clone(),
            }));
        }

        self.name = name;
        self.email = email;
        Ok(())
    }
}

impl AggregateRoot for Student {
    const AGGREGATE_TYPE: &'static str = "Student";

    fn aggregate_id(&self) -> Uuid {
        self.id
    }
}

impl SoftDeletable for Student {
    fn is_deleted(&self) -> bool {
        self.is_deleted
    }
}

impl HasDomainEvents for Student {
    type Event = StudentEvent;

    fn pending_events(&self) -> &[StudentEvent] {
        &self.events
    }

    fn take_events(&mut self) -> Vec<StudentEvent> {
        std::mem::take(&mut self.events)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::student::events::STUDENT_EMAIL_CHANGED_TOPIC;

    fn test_name() -> Name {
        Name::create("John", "Doe").unwrap()
    }

    fn test_email(address: &str) -> Email {
        Email::create(address).unwrap()
    }

    fn test_course(name: &str) -> Course {
        Course::new(Uuid::new_v4(), name)
    }

    fn test_student(course: &Course) -> Student {
        Student::create(Uuid::new_v4(), test_name(), test_email("john.doe@example.com"), course.clone())
    }

    #[test]
    fn test_create_enrolls_in_initial_course() {
        let course = test_course("Mathematics");
        let student = test_student(&course);

        assert_eq!(student.enrollments().len(), 1);
        assert_eq!(student.enrollments()[0].course(), &course);
        assert_eq!(student.enrollments()[0].student_id(), student.id());
        assert!(student.pending_events().is_empty());
    }

    #[test]
    fn test_enroll_in_new_course() {
        let maths = test_course("Mathematics");
        let physics = test_course("Physics");
        let mut student = test_student(&maths);

        student.enroll_in(&physics).unwrap();

        assert_eq!(student.enrollments().len(), 2);
        assert_eq!(student.enrollments()[1].course(), &physics);
    }

    #[test]
    fn test_enroll_in_existing_course_fails() {
        let course = test_course("Mathematics");
        let mut student = test_student(&course);

        let err = student.enroll_in(&course).unwrap_err();

        assert_eq!(err, StudentError::AlreadyEnrolled("Mathematics".to_string()));
        assert!(err.to_string().contains("Already enrolled"));
        assert_eq!(student.enrollments().len(), 1);
    }

    #[test]
    fn test_disenroll_enrolled_course() {
        let maths = test_course("Mathematics");
        let physics = test_course("Physics");
        let mut student = test_student(&maths);
        student.enroll_in(&physics).unwrap();

        student.disenroll(&physics).unwrap();

        assert_eq!(student.enrollments().len(), 1);
        assert_eq!(student.enrollments()[0].course(), &maths);
    }

    #[test]
    fn test_disenroll_last_course_is_allowed() {
        let course = test_course("Mathematics");
        let mut student = test_student(&course);

        student.disenroll(&course).unwrap();

        assert!(student.enrollments().is_empty());
    }

    #[test]
    fn test_disenroll_not_enrolled_course_fails() {
        let maths = test_course("Mathematics");
        let physics = test_course("Physics");
        let mut student = test_student(&maths);

        let err = student.disenroll(&physics).unwrap_err();

        assert!(err.to_string().contains("not enrolled"));
        assert_eq!(student.enrollments().len(), 1);
    }

    #[test]
    fn test_restored_student_tracks_enrollment_changes() {
        let maths = test_course("Mathematics");
        let physics = test_course("Physics");
        let chemistry = test_course("Chemistry");
        let stored = test_student(&maths);
        let maths_enrollment = stored.enrollments()[0].id();
        let mut student = Student::restore(
            stored.id(),
            test_name(),
            test_email("john.doe@example.com"),
            stored.enrollments().to_vec(),
            false,
        );
        assert_eq!(student.added_enrollments().count(), 0);

        student.enroll_in(&physics).unwrap();
        student.enroll_in(&chemistry).unwrap();
        student.disenroll(&maths).unwrap();
        student.disenroll(&chemistry).unwrap();

        let added: Vec<_> = student.added_enrollments().map(|e| e.course().id).collect();
        assert_eq!(added, vec![physics.id]);
        assert_eq!(student.removed_enrollments(), &[maths_enrollment]);
    }

    #[test]
    fn test_created_student_reports_initial_enrollment_as_added() {
        let course = test_course("Mathematics");
        let student = test_student(&course);

        assert_eq!(student.added_enrollments().count(), 1);
        assert!(student.removed_enrollments().is_empty());
    }

    #[test]
    fn test_edit_personal_info_with_email_change_queues_event() {
        let mut student = test_student(&test_course("Mathematics"));
        let new_email = test_email("new.email@example.com");

        student.edit_personal_info(Some(test_name()), Some(new_email.clone())).unwrap();

        assert_eq!(student.email(), &new_email);
        assert_eq!(student.pending_events().len(), 1);

        let StudentEvent::EmailChanged(event) = &student.pending_events()[0];
        assert_eq!(event.student_id, student.id());
        assert_eq!(event.new_email, new_email);
    }

    #[test]
    fn test_edit_personal_info_same_email_updates_name_without_event() {
        let mut student = test_student(&test_course("Mathematics"));
        let new_name = Name::create("Johnny", "Doe").unwrap();

        student
            .edit_personal_info(Some(new_name.clone()), Some(test_email("john.doe@example.com")))
            .unwrap();

        assert_eq!(student.name(), &new_name);
        assert!(student.pending_events().is_empty());
    }

    #[test]
    fn test_edit_personal_info_missing_values_fail_without_changes() {
        let mut student = test_student(&test_course("Mathematics"));
        let other_email = test_email("other@example.com");

        let err = student.edit_personal_info(None, Some(other_email)).unwrap_err();
        assert_eq!(err, StudentError::EmptyName);

        let err = student.edit_personal_info(Some(Name::create("A", "B").unwrap()), None).unwrap_err();
        assert_eq!(err, StudentError::EmptyEmail);

        assert_eq!(student.name(), &test_name());
        assert_eq!(student.email().as_str(), "john.doe@example.com");
        assert!(student.pending_events().is_empty());
    }

    #[test]
    fn test_drain_outbox_serializes_and_clears_events() {
        let mut student = test_student(&test_course("Mathematics"));
        student
            .edit_personal_info(Some(test_name()), Some(test_email("jd@example.com")))
            .unwrap();

        let messages = student.drain_outbox().unwrap();

        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].aggregate_id, student.id());
        assert_eq!(messages[0].aggregate_type, "Student");
        assert_eq!(messages[0].event_type, "StudentEmailChanged");
        assert_eq!(messages[0].topic, STUDENT_EMAIL_CHANGED_TOPIC);
        assert!(student.pending_events().is_empty());

        let decoded: StudentEvent = messages[0].decode().unwrap();
        let StudentEvent::EmailChanged(event) = decoded;
        assert_eq!(event.new_email.as_str(), "jd@example.com");
    }
}
