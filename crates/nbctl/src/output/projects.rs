use netsblox_primitives::projects::ProjectMetadata;
use serde::Serialize;

use super::{table, Report};

#[derive(Debug, Serialize)]
pub struct ProjectList {
    pub projects: Vec<ProjectMetadata>,
}

impl Report for ProjectList {
    fn report(&self) {
        if self.projects.is_empty() {
            println!("No projects found");
            return;
        }

        let mut table = table(&["ID", "Name", "Owner", "State", "Roles"]);
        for project in &self.projects {
            let roles = project
                .roles
                .values()
                .map(|role| role.name.as_str())
                .collect::<Vec<_>>()
                .join(", ");

            let _ = table.add_row(vec![
                project.id.to_string(),
                project.name.clone(),
                project.owner.clone(),
                format!("{:?}", project.state),
                roles,
            ]);
        }

        println!("{table}");
    }
}
