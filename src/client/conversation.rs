use tracing::{debug, warn};

use super::{
    AssistantAccumulator, CONNECT_ERROR_MESSAGE, ClientError, Frame, RelayClient, Transcript,
};
use crate::message::ChatMessage;

/// One chat panel: the transcript plus its in-flight flag.
///
/// `send` takes `&mut self`, so a conversation can only have one reply
/// streaming at a time.
#[derive(Debug, Default)]
pub struct Conversation {
    transcript: Transcript,
    loading: bool,
}

/// Clears the loading flag on every exit, including a dropped future.
struct LoadingGuard<'a>(&'a mut bool);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn messages(&self) -> &[ChatMessage] {
        self.transcript.messages()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Append a user turn, send the history, and stream the reply into the
    /// transcript. `on_update` sees each new piece of assistant text along
    /// with the updated transcript.
    ///
    /// Never fails: errors end up as the assistant turn. Returns `false` when
    /// the input was blank or a reply is already streaming.
    pub async fn send<F>(&mut self, client: &RelayClient, input: &str, mut on_update: F) -> bool
    where
        F: FnMut(&str, &Transcript),
    {
        let text = input.trim();
        if text.is_empty() || self.loading {
            return false;
        }

        let Conversation { transcript, loading } = self;
        transcript.push_user(text);
        *loading = true;
        let _guard = LoadingGuard(loading);

        let history = transcript.messages().to_vec();
        let mut acc = AssistantAccumulator::default();

        if let Err(err) = stream_reply(client, &history, transcript, &mut acc, &mut on_update).await {
            let message = match err {
                ClientError::Rejected { status, message } => {
                    warn!(%status, "relay rejected chat request");
                    message
                }
                ClientError::Http(e) => {
                    warn!(error = %e, "chat stream failed");
                    CONNECT_ERROR_MESSAGE.to_string()
                }
            };
            upsert(transcript, &mut acc, &mut on_update, &message);
        }
        true
    }
}

async fn stream_reply<F>(
    client: &RelayClient,
    history: &[ChatMessage],
    transcript: &mut Transcript,
    acc: &mut AssistantAccumulator,
    on_update: &mut F,
) -> Result<(), ClientError>
where
    F: FnMut(&str, &Transcript),
{
    let mut frames = client.open(history).await?;
    while let Some(batch) = frames.next_frames().await? {
        for frame in batch {
            match frame {
                Frame::Delta(chunk) => upsert(transcript, acc, on_update, &chunk),
                Frame::Done => debug!("received done sentinel"),
            }
        }
    }
    Ok(())
}

fn upsert<F>(transcript: &mut Transcript, acc: &mut AssistantAccumulator, on_update: &mut F, chunk: &str)
where
    F: FnMut(&str, &Transcript),
{
    transcript.upsert_assistant(acc.push(chunk));
    on_update(chunk, transcript);
}
