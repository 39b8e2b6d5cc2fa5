use arboard::Clipboard;
use crate::dashboard::types::Dashboard;

impl Dashboard {
    pub fn get_animated_dots(&self) -> &'static str {
        match self.animation_frame % 4 {
            0 => "   ",
            1 => ".  ",
            2 => ".. ",
            3 => "...",
            _ => "   ",
        }
    }
    pub fn get_pulse_intensity(&self) -> u8 {
        let phase = (self.animation_frame % 20) as f32 / 20.0;
        let pulse = ((phase * std::f32::consts::PI * 2.0).sin() + 1.0) / 2.0;
        (pulse * 155.0 + 100.0) as u8  // 100-255
    }
    pub fn copy_sender_to_clipboard(&mut self) {
        match self.controller.sender().map(|s| s.pubkey().to_string()) {
            Some(address) => self.copy_to_clipboard("Sender", address),
            None => self.status_message = Some("No sender account yet - create one first".to_string()),
        }
    }
    pub fn copy_recipient_to_clipboard(&mut self) {
        match self.controller.recipient().map(|pk| pk.to_string()) {
            Some(address) => self.copy_to_clipboard("Wallet", address),
            None => self.status_message = Some("No wallet connected".to_string()),
        }
    }
    fn copy_to_clipboard(&mut self, label: &str, text: String) {
        match Clipboard::new() {
            Ok(mut clipboard) => match clipboard.set_text(text) {
                Ok(_) => {
                    self.controller
                        .toasts_mut()
                        .success(format!("{} address copied to clipboard!", label));
                }
                Err(e) => {
                    self.status_message = Some(format!("Failed to copy to clipboard: {}", e));
                }
            },
            Err(e) => {
                self.status_message = Some(format!("Failed to access clipboard: {}", e));
            }
        }
    }
}
