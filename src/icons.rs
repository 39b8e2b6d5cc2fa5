// ASCII art icons that work in all terminals

pub struct Icons;

impl Icons {
    // Action icons
    pub const CREATE: &'static str = "[+]";
    pub const CONNECT: &'static str = "[=]";
    pub const DISCONNECT: &'static str = "[/]";
    pub const TRANSFER: &'static str = "[→]";

    // Toast icons
    pub const LOADING: &'static str = "[~]";
    pub const SUCCESS: &'static str = "[✓]";
    pub const ERROR: &'static str = "[✗]";
    pub const INFO: &'static str = "[i]";

    // Panel icons
    pub const SENDER: &'static str = "[S]";
    pub const WALLET: &'static str = "[W]";
    pub const NETWORK: &'static str = "[N]";
}
