use serde::Serialize;

use super::{table, Report};

#[derive(Debug, Serialize)]
pub struct FriendList {
    pub online: bool,
    pub friends: Vec<String>,
}

impl Report for FriendList {
    fn report(&self) {
        if self.friends.is_empty() {
            if self.online {
                println!("No friends online");
            } else {
                println!("No friends found");
            }
            return;
        }

        let header = if self.online { "Online friends" } else { "Friends" };
        let mut table = table(&[header]);
        for friend in &self.friends {
            let _ = table.add_row(vec![friend]);
        }

        println!("{table}");
    }
}
