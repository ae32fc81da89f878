use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct ContactRequest {
    pub name: String,
    pub message: String,
}

impl ContactRequest {
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && !self.message.trim().is_empty()
    }

    /// Builds the `mailto:` link handed off to the visitor's mail client.
    pub fn mailto(&self, recipient: &str) -> String {
        let name = self.name.trim();
        let subject = format!("[Portfolio Contact] New message from {name}");
        let body = format!("Name: {name}\n\nMessage:\n{}", self.message);

        format!(
            "mailto:{recipient}?subject={}&body={}",
            urlencoding::encode(&subject),
            urlencoding::encode(&body),
        )
    }
}
