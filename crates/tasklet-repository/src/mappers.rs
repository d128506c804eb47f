//! Field-for-field conversions between the wire, stored, and domain shapes.

use tasklet_core::Task;
use tasklet_remote::TaskResponse;
use tasklet_store::TaskEntity;

/// Wire record to stored record.
pub fn response_to_entity(response: TaskResponse) -> TaskEntity {
    TaskEntity {
        id: response.id,
        title: response.title,
        due_date: response.due_date,
        description: response.description,
        is_completed: response.is_completed,
        file_url: response.file_url,
    }
}

/// Wire record to domain task.
pub fn response_to_domain(response: TaskResponse) -> Task {
    Task {
        id: response.id,
        title: response.title,
        due_date: response.due_date,
        description: response.description,
        is_completed: response.is_completed,
        file_url: response.file_url,
    }
}

/// Stored record to domain task.
pub fn entity_to_domain(entity: TaskEntity) -> Task {
    Task {
        id: entity.id,
        title: entity.title,
        due_date: entity.due_date,
        description: entity.description,
        is_completed: entity.is_completed,
        file_url: entity.file_url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response() -> TaskResponse {
        TaskResponse {
            id: 11,
            title: "Dentist".into(),
            due_date: "2025-12-15T06:00".into(),
            description: "Bring forms".into(),
            is_completed: true,
            file_url: Some("https://files.example/forms.pdf".into()),
        }
    }

    #[test]
    fn wire_to_stored_to_domain_matches_wire_to_domain() {
        let via_store = entity_to_domain(response_to_entity(response()));
        assert_eq!(via_store, response_to_domain(response()));
    }

    #[test]
    fn stored_fields_carry_over() {
        let task = entity_to_domain(response_to_entity(response()));
        assert_eq!(task.id, 11);
        assert_eq!(task.title, "Dentist");
        assert_eq!(task.due_date, "2025-12-15T06:00");
        assert!(task.is_completed);
        assert_eq!(task.file_url.as_deref(), Some("https://files.example/forms.pdf"));
    }

    #[test]
    fn absent_file_url_survives() {
        let mut wire = response();
        wire.file_url = None;
        assert_eq!(response_to_entity(wire).file_url, None);
    }
}
