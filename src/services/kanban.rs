// services/kanban.rs - Kanban board assembled from a project's tasks

use serde::Serialize;

use crate::database::models::{Task, TaskStatus};

#[derive(Debug, Clone, Serialize)]
pub struct KanbanColumn {
    pub status: TaskStatus,
    pub tasks: Vec<Task>,
}

/// Tasks grouped into one column per status, in board order
#[derive(Debug, Clone, Serialize)]
pub struct KanbanBoard {
    pub columns: Vec<KanbanColumn>,
}

impl KanbanBoard {
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        let mut columns: Vec<KanbanColumn> = TaskStatus::ALL
            .iter()
            .map(|&status| KanbanColumn { status, tasks: Vec::new() })
            .collect();

        for task in tasks {
            if let Some(column) = columns.iter_mut().find(|c| c.status == task.status) {
                column.tasks.push(task);
            }
        }

        for column in &mut columns {
            column
                .tasks
                .sort_by(|a, b| a.position.cmp(&b.position).then(a.created_at.cmp(&b.created_at)));
        }

        Self { columns }
    }

    pub fn task_count(&self) -> usize {
        self.columns.iter().map(|c| c.tasks.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn task(title: &str, status: TaskStatus, position: i32, age_minutes: i64) -> Task {
        let created = Utc::now() - Duration::minutes(age_minutes);
        Task {
            id: Uuid::new_v4(),
            project_id: Uuid::nil(),
            phase_id: None,
            title: title.to_string(),
            description: None,
            status,
            position,
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn board_has_every_column_in_order() {
        let board = KanbanBoard::from_tasks(Vec::new());
        let statuses: Vec<TaskStatus> = board.columns.iter().map(|c| c.status).collect();
        assert_eq!(statuses, TaskStatus::ALL.to_vec());
        assert_eq!(board.task_count(), 0);
    }

    #[test]
    fn columns_sort_by_position_then_age() {
        let board = KanbanBoard::from_tasks(vec![
            task("late", TaskStatus::Todo, 2, 10),
            task("newer", TaskStatus::Todo, 1, 1),
            task("older", TaskStatus::Todo, 1, 5),
            task("shipped", TaskStatus::Done, 0, 3),
        ]);

        let todo: Vec<&str> = board.columns[0].tasks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(todo, vec!["older", "newer", "late"]);
        assert_eq!(board.columns[3].tasks.len(), 1);
        assert_eq!(board.task_count(), 4);
    }
}
