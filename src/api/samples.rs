//! Sample projects shown when the project service cannot be reached.

use super::{Permit, Project};

const SAMPLE_TIMESTAMP: &str = "2025-09-18T19:56:54.121075";

fn project(id: &str, name: &str, address: &str, manager: &str, phone: &str) -> Project {
    Project {
        id: id.to_string(),
        name: name.to_string(),
        address: address.to_string(),
        manager_name: manager.to_string(),
        manager_phone: phone.to_string(),
        permits: Vec::new(),
    }
}

pub fn sample_projects() -> Vec<Project> {
    let mut downtown = project(
        "1",
        "Downtown Office Renovation",
        "123 Main St, Springfield, IL",
        "Alice Johnson",
        "555-123-4567",
    );
    downtown.permits.push(Permit {
        id: "bb94946e-d353-4426-a390-87bac0bf3911".to_string(),
        project_id: "1".to_string(),
        issued_at: SAMPLE_TIMESTAMP.to_string(),
        expires_at: "2026-09-18T19:56:54.121075".to_string(),
        image_url: "https://constructhub-permits.s3.amazonaws.com/1/permit.png".to_string(),
        created_at: SAMPLE_TIMESTAMP.to_string(),
        last_updated: "2025-09-18T19:56:54".to_string(),
    });

    vec![
        downtown,
        project(
            "2",
            "Riverside Mall Expansion",
            "456 River Rd, Dayton, OH",
            "Carlos Mendoza",
            "555-234-5678",
        ),
        project(
            "3",
            "Greenfield Apartments",
            "789 Elm St, Greenfield, MA",
            "Samantha Lee",
            "555-345-6789",
        ),
        project(
            "4",
            "Tech Park Development",
            "321 Innovation Blvd, Austin, TX",
            "David Chen",
            "555-456-7890",
        ),
        project(
            "5",
            "Harborview Condos",
            "987 Ocean Dr, Miami, FL",
            "Lena Rodríguez",
            "555-567-8901",
        ),
    ]
}
