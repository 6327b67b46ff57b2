use sintra_core::{Agent, Task};

use sintra_core::resources::parse_timestamp;

/// Box-drawn table with fixed column widths.
pub struct TableFormatter {
    headers: Vec<&'static str>,
    widths: Vec<usize>,
}

impl TableFormatter {
    pub fn for_tasks(tasks: &[Task]) -> Self {
        let id_width = tasks
            .iter()
            .map(|t| t.id.chars().count())
            .max()
            .unwrap_or(8)
            .clamp(2, 36);
        let description_width = tasks
            .iter()
            .map(|t| t.description.chars().count())
            .max()
            .unwrap_or(20)
            .clamp(11, 50);

        Self {
            headers: vec!["ID", "Status", "Agent", "Description", "Created"],
            widths: vec![id_width, 12, 14, description_width, 16],
        }
    }

    pub fn for_agents(agents: &[Agent]) -> Self {
        let role_width = agents
            .iter()
            .map(|a| a.role.chars().count())
            .max()
            .unwrap_or(12)
            .clamp(4, 30);

        Self {
            headers: vec!["ID", "Agent", "Role", "Tasks", "Description"],
            widths: vec![8, 12, role_width, 5, 40],
        }
    }

    pub fn print_tasks(&self, tasks: &[Task]) {
        let rows: Vec<Vec<String>> = tasks.iter().map(task_row).collect();
        self.print_rows(&rows);
    }

    pub fn print_agents(&self, agents: &[Agent]) {
        let rows: Vec<Vec<String>> = agents
            .iter()
            .map(|agent| {
                vec![
                    agent.id.clone(),
                    format!("{} {}", agent.emoji, agent.name),
                    agent.role.clone(),
                    agent.task_count.to_string(),
                    agent.description.clone(),
                ]
            })
            .collect();
        self.print_rows(&rows);
    }

    fn print_rows(&self, rows: &[Vec<String>]) {
        println!("{}", self.border('┌', '┬', '┐'));
        println!("{}", self.row(self.headers.iter().copied()));
        println!("{}", self.border('├', '┼', '┤'));
        for cells in rows {
            println!("{}", self.row(cells.iter().map(String::as_str)));
        }
        println!("{}", self.border('└', '┴', '┘'));
    }

    fn row<'a>(&self, cells: impl Iterator<Item = &'a str>) -> String {
        let cells: Vec<String> = cells
            .zip(&self.widths)
            .map(|(cell, width)| truncate(cell, *width))
            .collect();
        format!("│ {} │", cells.join(" │ "))
    }

    fn border(&self, left: char, middle: char, right: char) -> String {
        let segments: Vec<String> = self.widths.iter().map(|w| "─".repeat(w + 2)).collect();
        format!("{}{}{}", left, segments.join(&middle.to_string()), right)
    }
}

fn task_row(task: &Task) -> Vec<String> {
    let agent = task
        .agent
        .as_ref()
        .map(|a| format!("{} {}", a.emoji, a.name))
        .unwrap_or_else(|| "-".to_string());

    vec![
        task.id.clone(),
        format!("{} {}", task.status.icon(), task.status),
        agent,
        task.description.clone(),
        format_timestamp(&task.created_at),
    ]
}

/// Render a server timestamp as `YYYY-MM-DD HH:MM`, or as-is when unparseable.
pub fn format_timestamp(raw: &str) -> String {
    parse_timestamp(raw)
        .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// Truncate a string to a maximum display width, adding "..." if truncated.
///
/// Counts characters, not bytes, so accented text and emoji are never split.
pub fn truncate(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_len {
        format!("{:<width$}", s, width = max_len)
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{:<width$}", format!("{}...", truncated), width = max_len)
    }
}
