//! # Help Text

pub fn main_help(prefix: char) -> String {
    format!(
        "**orgbot - GitHub organization commands**\n\
         `{prefix}repos` - list the organization's repositories\n\
         `{prefix}repo <name>` - show one repository (falls back to a keyword lookup)\n\
         `{prefix}search <term>` - search repositories in the organization\n\
         `{prefix}create [name]` - create a repository (no name starts a guided form)\n\
         `{prefix}cancel` - abort an active form or selection\n\
         `{prefix}help` - this message"
    )
}
