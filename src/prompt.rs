use serde::Serialize;

/// What the model is asked to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Command,
    Script,
}

impl OutputKind {
    pub fn from_script_flag(script: bool) -> Self {
        if script {
            OutputKind::Script
        } else {
            OutputKind::Command
        }
    }

    pub fn noun(self) -> &'static str {
        match self {
            OutputKind::Command => "command",
            OutputKind::Script => "script",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

/// A system message followed by a user message, in that order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    system: Message,
    user: Message,
}

impl Conversation {
    pub fn new(system_prompt: String, user_prompt: String) -> Self {
        Self {
            system: Message {
                role: Role::System,
                content: system_prompt,
            },
            user: Message {
                role: Role::User,
                content: user_prompt,
            },
        }
    }

    pub fn messages(&self) -> [&Message; 2] {
        [&self.system, &self.user]
    }

    pub fn user(&self) -> &Message {
        &self.user
    }
}

pub fn build_system_prompt(kind: OutputKind) -> String {
    let noun = kind.noun();
    format!(
        "You are an assistant skilled in generating bash {noun}s based on user descriptions. \
No markup. No description, just the {noun}."
    )
}

/// Renders the user instruction. `description` is inserted verbatim.
pub fn build_instruction(description: &str, kind: OutputKind, multiple: bool) -> String {
    let noun = kind.noun();
    let mut instruction = format!("Generate a bash {noun} to: {description}.");
    if multiple {
        instruction.push_str(&format!(
            " If this is a complex action, provide multiple {noun}s separated by '&&'."
        ));
    }
    instruction
}

/// Callers must reject descriptions that are empty after trimming.
pub fn build_conversation(description: &str, kind: OutputKind, multiple: bool) -> Conversation {
    Conversation::new(
        build_system_prompt(kind),
        build_instruction(description, kind, multiple),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const MULTIPLE_SUFFIX: &str =
        " If this is a complex action, provide multiple commands separated by '&&'.";

    #[test]
    fn conversation_is_system_then_user() {
        let conv = build_conversation(
            "list files in the current directory",
            OutputKind::Command,
            false,
        );
        let roles: Vec<Role> = conv.messages().iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::System, Role::User]);
        assert!(conv
            .user()
            .content
            .contains("Generate a bash command to: list files in the current directory."));
    }

    #[test]
    fn multiple_suffix_only_when_requested() {
        let with = build_instruction("back up my home dir", OutputKind::Command, true);
        assert!(with.ends_with(MULTIPLE_SUFFIX));

        let without = build_instruction("back up my home dir", OutputKind::Command, false);
        assert!(!without.contains("provide multiple"));
        assert_eq!(without, "Generate a bash command to: back up my home dir.");
    }

    #[test]
    fn script_mode_replaces_every_command_noun() {
        let conv = build_conversation("rotate logs", OutputKind::Script, true);
        for message in conv.messages() {
            assert!(!message.content.contains("command"), "{}", message.content);
        }
        assert_eq!(
            conv.messages()[0].content,
            "You are an assistant skilled in generating bash scripts based on user descriptions. \
No markup. No description, just the script."
        );
        assert_eq!(
            conv.user().content,
            "Generate a bash script to: rotate logs. If this is a complex action, \
provide multiple scripts separated by '&&'."
        );
    }

    #[test]
    fn description_is_not_escaped() {
        let raw = "echo {name} && printf '%s' \"$HOME\"";
        let instruction = build_instruction(raw, OutputKind::Command, false);
        assert_eq!(instruction, format!("Generate a bash command to: {raw}."));
    }

    #[test]
    fn roles_serialize_lowercase() {
        let conv = build_conversation("show uptime", OutputKind::Command, false);
        let json = serde_json::to_value(conv.messages()).unwrap();
        assert_eq!(json[0]["role"], "system");
        assert_eq!(json[1]["role"], "user");
        assert_eq!(json[1]["content"], "Generate a bash command to: show uptime.");
    }
}
