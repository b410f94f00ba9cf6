use clap::Parser;
use eyre::Result;

use crate::cli::Environment;
use crate::output::RoomList;

#[derive(Copy, Clone, Debug, Parser)]
#[command(about = "List the rooms currently open on the cloud")]
pub struct RoomsCommand;

impl RoomsCommand {
    pub async fn run(self, environment: &mut Environment) -> Result<()> {
        let rooms = environment.client.get_rooms().await?;

        environment.output.write(&RoomList { rooms });

        Ok(())
    }
}
