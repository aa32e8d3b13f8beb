//! Line-delimited JSON loop over stdin/stdout

use crate::dispatcher::{FileStore, Request, Response};
use crate::error::Result;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info};

/// Dispatch one parsed request against the store
pub fn handle_request(store: &FileStore, request: &Request) -> Response {
    match request.action.as_str() {
        "upload" => {
            let Some(filename) = request.data.get("filename").and_then(Value::as_str) else {
                return Response::error("Campo 'filename' mancante");
            };
            let Some(content) = request.data.get("content").and_then(Value::as_str) else {
                return Response::error("Campo 'content' mancante");
            };
            match store.upload(filename, content) {
                Ok(path) => Response::success_with_message(
                    format!("File {} salvato", filename),
                    json!({ "path": path.to_string_lossy() }),
                ),
                Err(e) => Response::error(e.to_string()),
            }
        }
        "list" => match store.list() {
            Ok(files) => Response::success(json!({ "files": files })),
            Err(e) => Response::error(e.to_string()),
        },
        "read" => {
            let Some(filename) = request.data.get("filename").and_then(Value::as_str) else {
                return Response::error("Campo 'filename' mancante");
            };
            match store.read(filename) {
                Ok(payload) => Response::success(payload),
                Err(e) => Response::error(e.to_string()),
            }
        }
        "configure" => {
            // `json_file` is the historical field name; `credentials_file` is
            // accepted as an alias
            let filename = request
                .data
                .get("json_file")
                .or_else(|| request.data.get("credentials_file"))
                .and_then(Value::as_str);
            let Some(filename) = filename else {
                return Response::error("Campo 'json_file' mancante");
            };
            match store.configure(filename) {
                Ok(payload) => {
                    Response::success_with_message("Google Cloud configurato", payload)
                }
                Err(e) => Response::error(e.to_string()),
            }
        }
        other => Response::error(format!("Azione sconosciuta: {}", other)),
    }
}

/// Read requests from stdin and write one response line per request line.
///
/// Malformed lines get an error response instead of terminating the loop;
/// the loop ends only on EOF.
pub async fn run_stdio(store: FileStore) -> Result<()> {
    info!("dispatcher in ascolto su stdin");

    let stdin = tokio::io::stdin();
    let mut stdout = tokio::io::stdout();
    let mut reader = BufReader::new(stdin);
    let mut line = String::new();

    loop {
        line.clear();
        match reader.read_line(&mut line).await {
            Ok(0) => {
                info!("stdin chiuso, dispatcher terminato");
                break;
            }
            Ok(_) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                debug!("richiesta: {}", trimmed);

                let response = match serde_json::from_str::<Request>(trimmed) {
                    Ok(request) => handle_request(&store, &request),
                    Err(e) => Response::error(format!("Richiesta non valida: {}", e)),
                };

                let mut out = serde_json::to_string(&response)?;
                out.push('\n');
                stdout.write_all(out.as_bytes()).await?;
                stdout.flush().await?;
            }
            Err(e) => {
                error!("errore di lettura da stdin: {}", e);
                break;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::ResponseStatus;
    use tempfile::TempDir;

    fn request(action: &str, data: Value) -> Request {
        Request {
            action: action.to_string(),
            data,
        }
    }

    #[test]
    fn test_upload_then_list_then_read() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        let response = handle_request(
            &store,
            &request("upload", json!({"filename": "note.txt", "content": "ciao"})),
        );
        assert_eq!(response.status, ResponseStatus::Success);

        let response = handle_request(&store, &request("list", Value::Null));
        assert_eq!(response.status, ResponseStatus::Success);
        assert_eq!(response.payload["files"][0]["name"], "note.txt");

        let response = handle_request(&store, &request("read", json!({"filename": "note.txt"})));
        assert_eq!(response.payload["content"], "ciao");
    }

    #[test]
    fn test_unknown_action_and_missing_fields() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        let response = handle_request(&store, &request("destroy", Value::Null));
        assert_eq!(response.status, ResponseStatus::Error);

        let response = handle_request(&store, &request("upload", json!({"filename": "x.txt"})));
        assert_eq!(response.status, ResponseStatus::Error);
        assert!(response.message.unwrap().contains("content"));
    }
}
