use anyhow::anyhow;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};

use crate::mail::{Email, FlagUpdate, MailApi, Mailbox, NewEmail, Result};

/// Why an email is being fetched; decides what happens with the result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPurpose {
    Detail,
    Reply,
    ToggleArchive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdatePurpose {
    MarkRead,
    ToggleArchive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    ListMailbox {
        mailbox: Mailbox,
    },
    FetchEmail {
        id: u64,
        purpose: FetchPurpose,
    },
    UpdateFlags {
        id: u64,
        update: FlagUpdate,
        purpose: UpdatePurpose,
    },
    Send {
        draft: NewEmail,
    },
}

#[derive(Debug)]
pub enum Outcome {
    Mailbox {
        mailbox: Mailbox,
        result: Result<Vec<Email>>,
    },
    Email {
        id: u64,
        purpose: FetchPurpose,
        result: Result<Email>,
    },
    Updated {
        id: u64,
        update: FlagUpdate,
        purpose: UpdatePurpose,
        result: Result<()>,
    },
    Sent {
        result: Result<String>,
    },
}

/// A request stamped with the view generation it was issued under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub generation: u64,
    pub request: Request,
}

#[derive(Debug)]
pub struct Completed {
    pub generation: u64,
    pub outcome: Outcome,
}

/// Run one request against the API
pub fn execute(api: &dyn MailApi, request: Request) -> Outcome {
    match request {
        Request::ListMailbox { mailbox } => Outcome::Mailbox {
            mailbox,
            result: api.list_mailbox(mailbox),
        },
        Request::FetchEmail { id, purpose } => Outcome::Email {
            id,
            purpose,
            result: api.get_email(id),
        },
        Request::UpdateFlags {
            id,
            update,
            purpose,
        } => Outcome::Updated {
            id,
            update,
            purpose,
            result: api.update_flags(id, update),
        },
        Request::Send { draft } => Outcome::Sent {
            result: api.send_email(&draft),
        },
    }
}

/// Background thread that runs jobs in submission order. Dropping it
/// waits for the job in flight; jobs still queued are discarded.
pub struct Worker {
    jobs: Option<Sender<Job>>,
    completed: Receiver<Completed>,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Worker {
    pub fn spawn<A>(api: A) -> anyhow::Result<Self>
    where
        A: MailApi + Send + 'static,
    {
        let (job_tx, job_rx) = mpsc::channel::<Job>();
        let (done_tx, done_rx) = mpsc::channel::<Completed>();
        let stop = Arc::new(AtomicBool::new(false));
        let stopped = stop.clone();

        let handle = thread::Builder::new()
            .name("mail-worker".to_string())
            .spawn(move || {
                for job in job_rx {
                    if stopped.load(Ordering::Acquire) {
                        tracing::debug!(generation = job.generation, request = ?job.request, "discarding on shutdown");
                        break;
                    }
                    tracing::debug!(generation = job.generation, request = ?job.request, "running");
                    let outcome = execute(&api, job.request);
                    let done = Completed {
                        generation: job.generation,
                        outcome,
                    };
                    if done_tx.send(done).is_err() {
                        break;
                    }
                }
                tracing::debug!("mail worker stopped");
            })?;

        Ok(Self {
            jobs: Some(job_tx),
            completed: done_rx,
            stop,
            handle: Some(handle),
        })
    }

    pub fn submit(&self, job: Job) -> anyhow::Result<()> {
        self.jobs
            .as_ref()
            .ok_or_else(|| anyhow!("mail worker is shut down"))?
            .send(job)
            .map_err(|_| anyhow!("mail worker has stopped"))
    }

    /// Next finished job, if any, without blocking
    pub fn try_recv(&self) -> Option<Completed> {
        match self.completed.try_recv() {
            Ok(done) => Some(done),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => None,
        }
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Release);
        self.jobs.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::mail::MailError;
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};
    use std::time::{Duration, Instant};

    /// In-memory server that records every call
    #[derive(Clone, Default)]
    pub(crate) struct FakeApi {
        pub emails: Arc<Mutex<Vec<Email>>>,
        pub calls: Arc<Mutex<Vec<String>>>,
    }

    impl FakeApi {
        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }
    }

    impl MailApi for FakeApi {
        fn list_mailbox(&self, mailbox: Mailbox) -> Result<Vec<Email>> {
            self.record(format!("GET /emails/{}", mailbox));
            let emails = self.emails.lock().unwrap();
            Ok(emails
                .iter()
                .filter(|e| (mailbox == Mailbox::Archive) == e.archived)
                .cloned()
                .collect())
        }

        fn get_email(&self, id: u64) -> Result<Email> {
            self.record(format!("GET /emails/{}", id));
            self.emails
                .lock()
                .unwrap()
                .iter()
                .find(|e| e.id == id)
                .cloned()
                .ok_or(MailError::Server("Email not found.".to_string()))
        }

        fn update_flags(&self, id: u64, update: FlagUpdate) -> Result<()> {
            self.record(format!(
                "PUT /emails/{} {}",
                id,
                serde_json::to_string(&update).unwrap()
            ));
            let mut emails = self.emails.lock().unwrap();
            let email = emails
                .iter_mut()
                .find(|e| e.id == id)
                .ok_or(MailError::Status {
                    status: 404,
                    path: format!("/emails/{}", id),
                })?;
            match update {
                FlagUpdate::Read(read) => email.read = read,
                FlagUpdate::Archived(archived) => email.archived = archived,
            }
            Ok(())
        }

        fn send_email(&self, draft: &NewEmail) -> Result<String> {
            self.record("POST /emails".to_string());
            if draft.recipients.is_empty() {
                return Err(MailError::Server("At least one recipient required.".to_string()));
            }
            Ok("Email sent successfully.".to_string())
        }
    }

    /// Answers like `FakeApi` after a fixed delay
    struct SlowApi {
        inner: FakeApi,
        delay: Duration,
    }

    impl MailApi for SlowApi {
        fn list_mailbox(&self, mailbox: Mailbox) -> Result<Vec<Email>> {
            std::thread::sleep(self.delay);
            self.inner.list_mailbox(mailbox)
        }

        fn get_email(&self, id: u64) -> Result<Email> {
            std::thread::sleep(self.delay);
            self.inner.get_email(id)
        }

        fn update_flags(&self, id: u64, update: FlagUpdate) -> Result<()> {
            std::thread::sleep(self.delay);
            self.inner.update_flags(id, update)
        }

        fn send_email(&self, draft: &NewEmail) -> Result<String> {
            std::thread::sleep(self.delay);
            self.inner.send_email(draft)
        }
    }

    pub(crate) fn sample(id: u64, archived: bool) -> Email {
        Email {
            id,
            sender: format!("sender{}@example.com", id),
            recipients: "me@example.com".to_string(),
            subject: format!("Subject {}", id),
            body: "Hello there".to_string(),
            timestamp: "Jan 1 2020, 12:00 AM".to_string(),
            read: false,
            archived,
        }
    }

    #[test]
    fn test_execute_routes_requests() {
        let api = FakeApi::default();
        api.emails.lock().unwrap().extend([sample(1, false), sample(2, true)]);

        let outcome = execute(&api, Request::ListMailbox { mailbox: Mailbox::Archive });
        match outcome {
            Outcome::Mailbox { mailbox, result } => {
                assert_eq!(mailbox, Mailbox::Archive);
                let ids: Vec<u64> = result.unwrap().iter().map(|e| e.id).collect();
                assert_eq!(ids, vec![2]);
            }
            other => panic!("unexpected outcome {:?}", other),
        }

        let outcome = execute(
            &api,
            Request::UpdateFlags {
                id: 1,
                update: FlagUpdate::Read(true),
                purpose: UpdatePurpose::MarkRead,
            },
        );
        assert!(matches!(outcome, Outcome::Updated { result: Ok(()), .. }));
        assert!(api.emails.lock().unwrap()[0].read);

        let outcome = execute(
            &api,
            Request::FetchEmail {
                id: 99,
                purpose: FetchPurpose::Detail,
            },
        );
        assert!(matches!(outcome, Outcome::Email { result: Err(MailError::Server(_)), .. }));

        assert_eq!(
            *api.calls.lock().unwrap(),
            vec![
                "GET /emails/archive".to_string(),
                r#"PUT /emails/1 {"read":true}"#.to_string(),
                "GET /emails/99".to_string(),
            ]
        );
    }

    #[test]
    fn test_worker_preserves_order_and_generation() {
        let api = FakeApi::default();
        api.emails.lock().unwrap().push(sample(5, false));
        let calls = api.calls.clone();
        let worker = Worker::spawn(api).unwrap();

        worker
            .submit(Job {
                generation: 1,
                request: Request::UpdateFlags {
                    id: 5,
                    update: FlagUpdate::Archived(true),
                    purpose: UpdatePurpose::ToggleArchive,
                },
            })
            .unwrap();
        worker
            .submit(Job {
                generation: 2,
                request: Request::ListMailbox { mailbox: Mailbox::Archive },
            })
            .unwrap();

        let mut done = Vec::new();
        let deadline = Instant::now() + Duration::from_secs(5);
        while done.len() < 2 && Instant::now() < deadline {
            match worker.try_recv() {
                Some(c) => done.push(c),
                None => std::thread::sleep(Duration::from_millis(5)),
            }
        }

        assert_eq!(done.len(), 2);
        assert_eq!(done[0].generation, 1);
        assert_eq!(done[1].generation, 2);
        match &done[1].outcome {
            Outcome::Mailbox { result: Ok(emails), .. } => assert_eq!(emails.len(), 1),
            other => panic!("unexpected outcome {:?}", other),
        }
        assert_eq!(calls.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_drop_discards_queued_jobs() {
        let api = FakeApi::default();
        let calls = api.calls.clone();
        let worker = Worker::spawn(SlowApi {
            inner: api,
            delay: Duration::from_millis(50),
        })
        .unwrap();

        for generation in 0..20 {
            worker
                .submit(Job {
                    generation,
                    request: Request::ListMailbox { mailbox: Mailbox::Inbox },
                })
                .unwrap();
        }
        std::thread::sleep(Duration::from_millis(20));

        let started = Instant::now();
        drop(worker);
        assert!(started.elapsed() < Duration::from_millis(500));
        assert!(calls.lock().unwrap().len() <= 2);
    }
}
