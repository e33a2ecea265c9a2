use anyhow::Result;

/// Asks the user whether a destructive operation may proceed.
pub trait Confirmation {
    fn confirm(&self, message: &str) -> Result<bool>;
}

impl<F> Confirmation for F
where
    F: Fn(&str) -> Result<bool>,
{
    fn confirm(&self, message: &str) -> Result<bool> {
        self(message)
    }
}

/// Terminal prompt. Anything but an explicit yes declines.
pub struct Prompt;

impl Confirmation for Prompt {
    fn confirm(&self, message: &str) -> Result<bool> {
        confirm(message)
    }
}

pub fn confirm(message: &str) -> Result<bool> {
    use dialoguer::Confirm;

    Ok(Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()?)
}
