use crate::config::FolioConfig;
use crate::display::render_contact_card;

pub struct ContactCommand;

impl ContactCommand {
    pub fn execute(&self, config: &FolioConfig) {
        print!("{}", render_contact_card(&config.display));
    }
}
