use color_eyre::Result;
use portal_client::Notification;
use questions::AssignmentRequest;

use crate::runtime::Runtime;

pub async fn run(test_id: String, students: Vec<String>, rt: &Runtime) -> Result<()> {
    let request = AssignmentRequest {
        test_id,
        student_ids: dedup_in_order(students),
    };
    let message = rt.api()?.assign_students(&request).await?;
    let text = if message.is_empty() {
        format!(
            "{} students assigned to test {}",
            request.student_ids.len(),
            request.test_id
        )
    } else {
        message
    };
    rt.notifier.notify(Notification::success(text));
    Ok(())
}

fn dedup_in_order(ids: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    ids.into_iter()
        .filter(|id| seen.insert(id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_students_are_sent_once() {
        let ids = dedup_in_order(vec!["s2".into(), "s1".into(), "s2".into()]);
        assert_eq!(ids, vec!["s2", "s1"]);
    }
}
