use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone)]
pub struct Command {
    pub name: String,
    pub args: Vec<String>,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.name)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

pub trait CommandHandler {
    fn add_item(&mut self, label: &str) -> Result<(), String>;
    /// Removes the item at 1-based `position`, returning its label
    fn remove_item(&mut self, position: usize) -> Result<String, String>;
    fn spin(&mut self) -> Result<(), String>;
    /// Flips sound on or off, returning whether it is now muted
    fn toggle_mute(&mut self) -> bool;
    fn list_items(&self) -> Vec<String>;
    fn quit(&mut self);
}

pub struct CommandProcessor {
    commands: BTreeMap<String, String>,
}

impl CommandProcessor {
    pub fn new() -> Self {
        let mut commands = BTreeMap::new();
        commands.insert("add".to_string(), "Add an item to the wheel".to_string());
        commands.insert(
            "remove".to_string(),
            "Remove the item at a position (1-based)".to_string(),
        );
        commands.insert("list".to_string(), "List the items on the wheel".to_string());
        commands.insert("spin".to_string(), "Spin the wheel".to_string());
        commands.insert("mute".to_string(), "Toggle sound effects".to_string());
        commands.insert("help".to_string(), "Show available commands".to_string());
        commands.insert("quit".to_string(), "Exit the application".to_string());

        Self { commands }
    }

    pub fn parse(&self, input: &str) -> Result<Command, String> {
        let input = input.trim();

        let Some(rest) = input.strip_prefix('/') else {
            return Err("Not a command (must start with /)".to_string());
        };

        let parts: Vec<&str> = rest.split_whitespace().collect();
        if parts.is_empty() {
            return Err("Empty command".to_string());
        }

        let name = parts[0].to_lowercase();
        let args = parts[1..].iter().map(|s| s.to_string()).collect();

        Ok(Command { name, args })
    }

    pub fn execute<H: CommandHandler>(
        &self,
        input: &str,
        handler: &mut H,
    ) -> Result<String, String> {
        let cmd = self.parse(input)?;

        match cmd.name.as_str() {
            "add" => {
                if cmd.args.is_empty() {
                    return Err("Missing item text".to_string());
                }
                let label = cmd.args.join(" ");
                handler.add_item(&label)?;
                Ok(format!("Added '{}'", label))
            }
            "remove" => {
                if cmd.args.is_empty() {
                    return Err("Missing item position".to_string());
                }
                let position: usize = cmd.args[0]
                    .parse()
                    .map_err(|_| "Position must be a number".to_string())?;
                let label = handler.remove_item(position)?;
                Ok(format!("Removed '{}'", label))
            }
            "list" => {
                let items = handler.list_items();
                if items.is_empty() {
                    return Ok("The wheel is empty".to_string());
                }

                let mut result = String::from("Items:");
                for (i, item) in items.iter().enumerate() {
                    result.push_str(&format!(" {}. {}", i + 1, item));
                }
                Ok(result)
            }
            "spin" => {
                handler.spin()?;
                Ok(String::new())
            }
            "mute" => {
                if handler.toggle_mute() {
                    Ok("Sound off".to_string())
                } else {
                    Ok("Sound on".to_string())
                }
            }
            "help" => {
                let names: Vec<String> = self.commands.keys().map(|k| format!("/{}", k)).collect();
                Ok(format!("Commands: {}", names.join(" ")))
            }
            "quit" => {
                handler.quit();
                Ok("Quitting application...".to_string())
            }
            _ => Err(format!("Unknown command: /{}", cmd.name)),
        }
    }

    pub fn get_commands(&self) -> Vec<(String, String)> {
        self.commands
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

impl Default for CommandProcessor {
    fn default() -> Self {
        Self::new()
    }
}
