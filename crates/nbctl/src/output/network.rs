use netsblox_primitives::network::RoomState;
use serde::Serialize;

use super::{table, Report};

#[derive(Debug, Serialize)]
pub struct RoomList {
    pub rooms: Vec<RoomState>,
}

impl Report for RoomList {
    fn report(&self) {
        if self.rooms.is_empty() {
            println!("No open rooms");
            return;
        }

        let mut table = table(&["ID", "Name", "Owner", "Occupants"]);
        for room in &self.rooms {
            let occupants = room
                .roles
                .values()
                .flat_map(|role| {
                    role.occupants
                        .iter()
                        .map(move |occupant| format!("{}@{}", occupant.name, role.name))
                })
                .collect::<Vec<_>>()
                .join(", ");

            let _ = table.add_row(vec![
                room.id.to_string(),
                room.name.clone(),
                room.owner.clone(),
                occupants,
            ]);
        }

        println!("{table}");
    }
}
