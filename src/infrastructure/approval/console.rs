//! Interactive review on the terminal

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};
use tokio::sync::Mutex;

use crate::domain::DomainError;
use crate::domain::approval::{ApprovalGateway, ApprovalOutcome, ApprovalRequest, TAKEOVER_SENTINEL};

/// Reads one line per decision: `y` approves, `t` takes over, anything else
/// is sent back as feedback
#[derive(Debug)]
pub struct ConsoleApprovalGateway<R> {
    input: Mutex<R>,
}

impl ConsoleApprovalGateway<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R> ConsoleApprovalGateway<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    pub fn new(input: R) -> Self {
        Self {
            input: Mutex::new(input),
        }
    }
}

fn interpret(line: &str) -> ApprovalOutcome {
    match line.trim() {
        "y" | "Y" | "yes" => ApprovalOutcome::approved(),
        "t" | "T" | "takeover" => ApprovalOutcome::takeover(),
        feedback => ApprovalOutcome::from_response(false, Some(feedback.to_string())),
    }
}

#[async_trait]
impl<R> ApprovalGateway for ConsoleApprovalGateway<R>
where
    R: AsyncBufRead + Unpin + Send + std::fmt::Debug,
{
    async fn request_approval(
        &self,
        request: ApprovalRequest,
    ) -> Result<ApprovalOutcome, DomainError> {
        println!("\nQuestion:\n{}\n\nDraft answer:\n{}\n", request.question, request.answer);
        println!("[y] approve  [t] take over  or type feedback:");

        let mut line = String::new();
        let mut input = self.input.lock().await;
        let read = input
            .read_line(&mut line)
            .await
            .map_err(|e| DomainError::internal(format!("Failed to read reviewer input: {}", e)))?;

        if read == 0 {
            // EOF: nobody is left to review
            return Ok(ApprovalOutcome::from_response(
                false,
                Some(TAKEOVER_SENTINEL.to_string()),
            ));
        }

        Ok(interpret(&line))
    }

    fn gateway_name(&self) -> &'static str {
        "console"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::work_item::WorkItemId;
    use std::io::Cursor;

    fn request() -> ApprovalRequest {
        ApprovalRequest::new(WorkItemId::generate(), "q", "a")
    }

    #[tokio::test]
    async fn test_reads_decisions_in_order() {
        let gateway = ConsoleApprovalGateway::new(Cursor::new(b"add an example\ny\n".to_vec()));

        let first = gateway.request_approval(request()).await.unwrap();
        assert!(!first.approved);
        assert_eq!(first.feedback.as_deref(), Some("add an example"));

        let second = gateway.request_approval(request()).await.unwrap();
        assert!(second.approved);
    }

    #[tokio::test]
    async fn test_takeover_and_eof() {
        let gateway = ConsoleApprovalGateway::new(Cursor::new(b"t\n".to_vec()));

        assert!(gateway.request_approval(request()).await.unwrap().takeover);
        assert!(gateway.request_approval(request()).await.unwrap().takeover);
    }
}
