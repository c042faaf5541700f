//! Create idempotency against the in-memory store: racing creates persist
//! once, and replays resolve even when the first name is shared.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::{fixture, rstest};

use employees::domain::ports::{EmployeeCommand, EmployeeQuery};
use employees::domain::{Address, Department, EmailAddress, EmployeeDetails, EmployeeService};
use employees::outbound::memory::InMemoryEmployeeRepository;

fn service() -> EmployeeService<InMemoryEmployeeRepository> {
    EmployeeService::new(
        Arc::new(InMemoryEmployeeRepository::new()),
        Arc::new(DefaultClock),
    )
}

fn person(first_name: &str, last_name: &str, department_id: u32, department: &str) -> EmployeeDetails {
    EmployeeDetails {
        first_name: first_name.to_owned(),
        last_name: last_name.to_owned(),
        department: Department {
            department_id,
            name: department.to_owned(),
            size: 5000,
            function: "Technology".to_owned(),
        },
        address: Address {
            city: "Hillsboro".to_owned(),
            street: None,
            postal_code: Some("97006".to_owned()),
            state: "Oregon".to_owned(),
        },
        email_addresses: vec![EmailAddress {
            email: format!("{}@mailinator.com", first_name.to_lowercase()),
            primary: true,
        }],
    }
}

#[fixture]
fn details() -> EmployeeDetails {
    person("Vishwanath", "Patil", 101, "NDE")
}

#[rstest]
#[actix_rt::test]
async fn racing_creates_persist_once(details: EmployeeDetails) {
    let service = service();

    let (left, right) = tokio::join!(
        service.create(details.clone()),
        service.create(details.clone())
    );
    let left = left.expect("left create");
    let right = right.expect("right create");

    assert_ne!(left.idempotent, right.idempotent);
    assert_eq!(left.employee.id, right.employee.id);
    let stored = service
        .find_by_department_name("NDE")
        .await
        .expect("department lookup");
    assert_eq!(stored.len(), 1);
}

#[rstest]
#[actix_rt::test]
async fn replay_of_second_namesake_is_idempotent() {
    let service = service();
    service
        .create(person("Vish", "Patil", 1, "NDE"))
        .await
        .expect("first namesake");
    let kumar = service
        .create(person("Vish", "Kumar", 2, "Sales"))
        .await
        .expect("second namesake");
    assert!(!kumar.idempotent);

    for _ in 0..3 {
        let replay = service
            .create(person("Vish", "Kumar", 2, "Sales"))
            .await
            .expect("replay resolves");
        assert!(replay.idempotent);
        assert_eq!(replay.employee.id, kumar.employee.id);
    }
}
