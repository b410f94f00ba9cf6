use netsblox_primitives::libraries::LibraryMetadata;
use serde::Serialize;

use super::{table, Report};

#[derive(Debug, Serialize)]
pub struct LibraryList {
    pub libraries: Vec<LibraryMetadata>,
}

impl Report for LibraryList {
    fn report(&self) {
        if self.libraries.is_empty() {
            println!("No libraries found");
            return;
        }

        let mut table = table(&["Name", "Owner", "State", "Notes"]);
        for library in &self.libraries {
            let _ = table.add_row(vec![
                library.name.clone(),
                library.owner.clone(),
                format!("{:?}", library.state),
                library.notes.clone(),
            ]);
        }

        println!("{table}");
    }
}
