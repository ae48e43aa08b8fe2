// src/application/shell.rs
//
// JSON-lines front end
//
// One intent per input line, one response per intent:
//
//   -> {"command":"set_field","field":"title","value":"Dune","request_id":4}
//   <- {"ok":true,"request_id":4,"view":{...}}
//   <- {"ok":false,"error":{"error_type":"...","message":"...","details":...}}
//
// Intents start in input order. One that is still waiting on the network
// finishes in its own task while later lines are read, so its response may
// arrive after theirs; `request_id` (any JSON value) is echoed to pair them.
//
// A line that is not UTF-8 or does not parse gets an error response and the
// shell keeps going. End of input ends the session once every outstanding
// response has been written. Only a failing reader or writer ends it early.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;

use crate::application::commands::{self, CommandResult};
use crate::application::dto::CatalogueViewDto;
use crate::application::error_handling::ErrorResponse;
use crate::application::state::AppState;
use crate::domain::BookId;
use crate::error::AppResult;

/// A user intent as it arrives on the wire.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Intent {
    View,
    Navigate {
        mode: String,
    },
    StartCreate,
    StartEdit {
        id: BookId,
    },
    ShowDetails {
        id: BookId,
    },
    SetField {
        field: String,
        #[serde(default)]
        value: String,
    },
    Submit,
    Remove {
        id: BookId,
        #[serde(default)]
        confirmed: bool,
    },
    Reload,
    Search {
        query: String,
    },
}

#[derive(Debug, Serialize)]
struct ShellResponse {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    view: Option<CatalogueViewDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorResponse>,
}

impl ShellResponse {
    fn new(request_id: Option<Value>, result: CommandResult) -> Self {
        match result {
            Ok(view) => Self {
                ok: true,
                request_id,
                view: Some(view),
                error: None,
            },
            Err(error) => Self {
                ok: false,
                request_id,
                view: None,
                error: Some(error),
            },
        }
    }
}

/// Route one intent to its command.
pub async fn dispatch(state: &AppState, intent: Intent) -> CommandResult {
    match intent {
        Intent::View => Ok(commands::view_catalogue(state)),
        Intent::Navigate { mode } => commands::navigate(state, &mode).await,
        Intent::StartCreate => commands::start_create(state),
        Intent::StartEdit { id } => commands::start_edit(state, id).await,
        Intent::ShowDetails { id } => commands::show_details(state, id).await,
        Intent::SetField { field, value } => commands::set_field(state, &field, value),
        Intent::Submit => commands::submit_form(state).await,
        Intent::Remove { id, confirmed } => commands::remove_book(state, id, confirmed).await,
        Intent::Reload => commands::reload_catalogue(state).await,
        Intent::Search { query } => commands::search_books(state, &query).await,
    }
}

/// Decode one raw line into its request id and intent.
fn parse_line(raw: &[u8]) -> Option<(Option<Value>, Result<Intent, ErrorResponse>)> {
    let text = match std::str::from_utf8(raw) {
        Ok(text) => text.trim(),
        Err(e) => {
            log::warn!("intent line is not UTF-8: {}", e);
            return Some((None, Err(ErrorResponse::bad_request(e))));
        }
    };
    if text.is_empty() {
        return None;
    }

    let value: Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("unparseable intent {:?}: {}", text, e);
            return Some((None, Err(ErrorResponse::bad_request(e))));
        }
    };
    let request_id = value.get("request_id").filter(|id| !id.is_null()).cloned();
    let intent = serde_json::from_value::<Intent>(value).map_err(|e| {
        log::warn!("unknown intent {:?}: {}", text, e);
        ErrorResponse::bad_request(e)
    });
    Some((request_id, intent))
}

enum Started {
    Blank,
    Answered(ShellResponse),
    Outstanding,
}

/// Run the intent up to its first network wait, in the caller's task, so
/// its state transition lands before the next line is read. If it is not
/// finished by then, the rest runs in its own task and answers on `responses`.
async fn start(
    state: &Arc<AppState>,
    raw: &[u8],
    responses: &mpsc::UnboundedSender<ShellResponse>,
) -> Started {
    let Some((request_id, intent)) = parse_line(raw) else {
        return Started::Blank;
    };
    let intent = match intent {
        Ok(intent) => intent,
        Err(error) => return Started::Answered(ShellResponse::new(request_id, Err(error))),
    };
    log::debug!("intent {:?}", intent);

    let state = Arc::clone(state);
    let mut task = Box::pin(async move { dispatch(&state, intent).await });

    tokio::select! {
        biased;
        result = &mut task => Started::Answered(ShellResponse::new(request_id, result)),
        _ = std::future::ready(()) => {
            let responses = responses.clone();
            tokio::spawn(async move {
                let response = ShellResponse::new(request_id, task.await);
                // The receiver outlives every outstanding intent
                let _ = responses.send(response);
            });
            Started::Outstanding
        }
    }
}

async fn write_response<W>(writer: &mut W, response: &ShellResponse) -> AppResult<()>
where
    W: AsyncWrite + Unpin,
{
    let mut out = serde_json::to_vec(response)?;
    out.push(b'\n');
    writer.write_all(&out).await?;
    writer.flush().await?;
    Ok(())
}

/// Serve intents from `reader` until end of input and every outstanding
/// intent has answered. Returns how many responses were written.
pub async fn run_shell<R, W>(state: Arc<AppState>, mut reader: R, mut writer: W) -> AppResult<usize>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let (responses, mut finished) = mpsc::unbounded_channel();
    let mut line = Vec::new();
    let mut input_open = true;
    let mut outstanding = 0usize;
    let mut handled = 0usize;

    while input_open || outstanding > 0 {
        tokio::select! {
            // read_until keeps a partial line in `line` when the other branch wins
            read = reader.read_until(b'\n', &mut line), if input_open => {
                if read? == 0 {
                    input_open = false;
                }
                if !input_open || line.ends_with(b"\n") {
                    let raw = std::mem::take(&mut line);
                    match start(&state, &raw, &responses).await {
                        Started::Blank => {}
                        Started::Answered(response) => {
                            write_response(&mut writer, &response).await?;
                            handled += 1;
                        }
                        Started::Outstanding => outstanding += 1,
                    }
                }
            }
            Some(response) = finished.recv(), if outstanding > 0 => {
                outstanding -= 1;
                write_response(&mut writer, &response).await?;
                handled += 1;
            }
        }
    }

    log::info!("input closed after {} responses", handled);
    Ok(handled)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::domain::{Book, BookDetails};
    use crate::events::EventBus;
    use crate::repositories::{GatedRemoteBookService, MockRemoteBookService, RemoteBookService};
    use crate::services::CatalogueViewController;

    fn state_with(service: Arc<dyn RemoteBookService>) -> Arc<AppState> {
        let event_bus = Arc::new(EventBus::new());
        let catalogue = Arc::new(CatalogueViewController::new(service, event_bus.clone()));
        Arc::new(AppState {
            event_bus,
            catalogue,
        })
    }

    fn app_state(service: MockRemoteBookService) -> Arc<AppState> {
        state_with(Arc::new(service))
    }

    fn parse_output(output: Vec<u8>) -> Vec<serde_json::Value> {
        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    async fn run_bytes(state: &Arc<AppState>, input: &[u8]) -> Vec<serde_json::Value> {
        let mut output = Vec::new();
        run_shell(state.clone(), input, &mut output).await.unwrap();
        parse_output(output)
    }

    async fn run(state: &Arc<AppState>, input: &str) -> Vec<serde_json::Value> {
        run_bytes(state, input.as_bytes()).await
    }

    fn dune() -> Book {
        Book::new(
            BookId::new("1"),
            BookDetails {
                title: "Dune".to_string(),
                author: "Herbert".to_string(),
                description: String::new(),
                genre: "SciFi".to_string(),
                pages: 412,
                rating: 4.5,
                price: 9.99,
            },
        )
    }

    #[test]
    fn test_intent_parsing() {
        let intent: Intent =
            serde_json::from_str(r#"{"command":"set_field","field":"title","value":"Dune"}"#)
                .unwrap();
        assert_eq!(
            intent,
            Intent::SetField {
                field: "title".to_string(),
                value: "Dune".to_string()
            }
        );

        let intent: Intent = serde_json::from_str(r#"{"command":"remove","id":42}"#).unwrap();
        assert_eq!(
            intent,
            Intent::Remove {
                id: BookId::new("42"),
                confirmed: false
            }
        );
    }

    #[tokio::test]
    async fn test_malformed_line_does_not_stop_shell() {
        let state = app_state(MockRemoteBookService::new());

        let responses = run(&state, "not json\n\n{\"command\":\"view\"}\n").await;

        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0]["ok"], false);
        assert_eq!(responses[0]["error"]["error_type"], "bad_request");
        assert_eq!(responses[1]["ok"], true);
        assert_eq!(responses[1]["view"]["mode"], "list");
    }

    #[tokio::test]
    async fn test_wrong_view_is_reported() {
        let state = app_state(MockRemoteBookService::new());

        let responses = run(
            &state,
            r#"{"command":"set_field","field":"title","value":"Dune"}"#,
        )
        .await;

        assert_eq!(responses[0]["ok"], false);
        assert_eq!(responses[0]["error"]["error_type"], "invalid_transition");
    }

    #[tokio::test]
    async fn test_unknown_field_is_a_domain_error() {
        let state = app_state(MockRemoteBookService::new());

        let responses = run(
            &state,
            "{\"command\":\"start_create\"}\n{\"command\":\"set_field\",\"field\":\"isbn\",\"value\":\"1\"}\n",
        )
        .await;

        assert_eq!(responses[1]["error"]["error_type"], "domain_error");
    }

    #[tokio::test]
    async fn test_create_session() {
        let mut service = MockRemoteBookService::new();
        service
            .expect_create()
            .times(1)
            .returning(|details| Ok(Book::new(BookId::new("1"), details.clone())));
        service.expect_list().times(1).returning(|| Ok(vec![dune()]));
        let state = app_state(service);

        let input = [
            r#"{"command":"start_create"}"#,
            r#"{"command":"set_field","field":"title","value":"Dune"}"#,
            r#"{"command":"set_field","field":"author","value":"Herbert"}"#,
            r#"{"command":"set_field","field":"genre","value":"SciFi"}"#,
            r#"{"command":"set_field","field":"pages","value":"412"}"#,
            r#"{"command":"set_field","field":"rating","value":"4.5"}"#,
            r#"{"command":"set_field","field":"price","value":"9.99"}"#,
            r#"{"command":"submit"}"#,
        ]
        .join("\n");
        let responses = run(&state, &input).await;

        assert_eq!(responses.len(), 8);
        let form = &responses[6]["view"]["form"];
        assert_eq!(form["fields"][4]["value"], "412");

        let last = &responses[7]["view"];
        assert_eq!(last["mode"], "list");
        assert_eq!(last["outcome"], "applied");
        assert_eq!(last["books"][0]["title"], "Dune");
        assert!(last["form"].is_null());
    }

    #[tokio::test]
    async fn test_invalid_submit_renders_field_errors() {
        let state = app_state(MockRemoteBookService::new());

        let responses = run(
            &state,
            "{\"command\":\"start_create\"}\n{\"command\":\"submit\"}\n",
        )
        .await;

        let view = &responses[1]["view"];
        assert_eq!(view["outcome"], "rejected");
        assert_eq!(view["form"]["fields"][0]["error"], "title is required");
        assert!(view["form"]["fields"][2]["error"].is_null());
    }

    #[tokio::test]
    async fn test_unconfirmed_remove_is_declined() {
        let state = app_state(MockRemoteBookService::new());

        let responses = run(&state, r#"{"command":"remove","id":"1"}"#).await;

        assert_eq!(responses[0]["view"]["outcome"], "declined");
    }

    #[tokio::test]
    async fn test_invalid_utf8_line_does_not_stop_shell() {
        let state = app_state(MockRemoteBookService::new());

        let responses = run_bytes(
            &state,
            b"{\"command\":\"view\"}\n\xff\xfe garbage\n{\"command\":\"view\"}\n",
        )
        .await;

        assert_eq!(responses.len(), 3);
        assert_eq!(responses[0]["ok"], true);
        assert_eq!(responses[1]["ok"], false);
        assert_eq!(responses[1]["error"]["error_type"], "bad_request");
        assert_eq!(responses[2]["ok"], true);
    }

    #[tokio::test]
    async fn test_last_line_without_newline_is_served() {
        let state = app_state(MockRemoteBookService::new());

        let responses = run(&state, "{\"command\":\"view\"}\n{\"command\":\"view\"}").await;

        assert_eq!(responses.len(), 2);
    }

    #[tokio::test]
    async fn test_request_id_is_echoed() {
        let state = app_state(MockRemoteBookService::new());

        let responses = run(
            &state,
            "{\"command\":\"view\",\"request_id\":7}\n{\"command\":\"fly\",\"request_id\":\"a\"}\n{\"command\":\"view\"}\n",
        )
        .await;

        assert_eq!(responses[0]["request_id"], 7);
        assert_eq!(responses[1]["ok"], false);
        assert_eq!(responses[1]["request_id"], "a");
        assert_eq!(responses[1]["error"]["error_type"], "bad_request");
        assert!(responses[2].get("request_id").is_none());
    }

    #[tokio::test]
    async fn test_pending_reload_does_not_block_later_intents() {
        let service = Arc::new(GatedRemoteBookService::default());
        let release = service.gate_list();
        let state = state_with(service);
        let catalogue = state.catalogue.clone();
        let initial = catalogue.snapshot().generation;

        let input = [
            r#"{"command":"reload","request_id":1}"#,
            r#"{"command":"view","request_id":2}"#,
            r#"{"command":"navigate","mode":"search","request_id":3}"#,
        ]
        .join("\n");
        let mut output = Vec::new();
        let (handled, _) = tokio::join!(
            run_shell(state.clone(), input.as_bytes(), &mut output),
            async move {
                while catalogue.snapshot().generation == initial {
                    tokio::task::yield_now().await;
                }
                release.send(Ok(vec![dune()])).unwrap();
            }
        );
        assert_eq!(handled.unwrap(), 3);

        let responses = parse_output(output);
        let by_id = |id: i64| {
            responses
                .iter()
                .find(|response| response["request_id"] == id)
                .unwrap()
                .clone()
        };

        let view = by_id(2);
        assert_eq!(view["view"]["in_flight"]["reloads"], 1);
        assert_eq!(view["view"]["busy"], true);

        let navigate = by_id(3);
        assert_eq!(navigate["view"]["mode"], "search");

        let reload = by_id(1);
        assert_eq!(reload["ok"], true);
        assert_eq!(reload["view"]["outcome"], "stale");
        assert_eq!(reload["view"]["mode"], "search");
        assert_eq!(reload["view"]["in_flight"]["reloads"], 0);
        assert!(reload["view"]["books"].as_array().unwrap().is_empty());
        assert_eq!(responses.last().unwrap()["request_id"], 1);

        let log = state.event_bus.get_event_log();
        assert!(log
            .iter()
            .any(|entry| entry.event_type == "StaleResponseDiscarded"));
    }
}
