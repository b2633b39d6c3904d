//! Pipeline test against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives the client through
//! a ureq-backed `Transport` over real HTTP: echo for merge/header/query
//! behavior, status routes for classification, and multipart upload for
//! the coercion path. The transport invokes its completion callback
//! synchronously, which the pipeline explicitly allows.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use courier_core::{
    Body, Client, Completion, DataType, Headers, Interceptor, Method, Outcome, Params,
    RawResponse, RequestDescriptor, RequestError, RequestOptions, ResponseData, TaskHandle,
    Transport, TransportRequest, TransportUpload, UploadSpec,
};

/// Executes transport descriptors with ureq, status codes returned as data
/// rather than `Err` so the client owns status interpretation.
struct UreqTransport;

impl UreqTransport {
    fn agent(timeout_ms: Option<u64>) -> ureq::Agent {
        ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout_ms.map(Duration::from_millis))
            .build()
            .new_agent()
    }

    fn raw_response(
        response: &mut ureq::http::Response<ureq::Body>,
        data_type: DataType,
    ) -> RawResponse {
        let status_code = response.status().as_u16();
        let header: Headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let text = response.body_mut().read_to_string().unwrap_or_default();
        let data = match data_type {
            DataType::Json => match serde_json::from_str(&text) {
                Ok(value) => ResponseData::Json(value),
                Err(_) => ResponseData::Text(text),
            },
            DataType::Text => ResponseData::Text(text),
        };
        RawResponse {
            status_code,
            data,
            header,
        }
    }
}

fn with_headers<Any>(
    mut builder: ureq::RequestBuilder<Any>,
    header: &Headers,
) -> ureq::RequestBuilder<Any> {
    for (name, value) in header {
        builder = builder.header(name, value);
    }
    builder
}

fn send_body(
    builder: ureq::RequestBuilder<ureq::typestate::WithBody>,
    data: &Option<Body>,
) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    match data {
        Some(Body::Json(value)) => builder
            .header("content-type", "application/json")
            .send(value.to_string().as_bytes()),
        Some(Body::Text(text)) => builder.send(text.as_bytes()),
        Some(Body::Bytes(bytes)) => builder.send(&bytes[..]),
        None => builder.send_empty(),
    }
}

impl Transport for UreqTransport {
    fn issue_request(&self, request: TransportRequest, complete: Completion) -> TaskHandle {
        let agent = Self::agent(Some(request.timeout_ms));
        let header = &request.header;
        let mut response = match (request.method, &request.data) {
            (Method::Get, _) => with_headers(agent.get(&request.url), header).call(),
            (Method::Head, _) => with_headers(agent.head(&request.url), header).call(),
            (Method::Delete, _) => with_headers(agent.delete(&request.url), header).call(),
            (Method::Post, data) => send_body(with_headers(agent.post(&request.url), header), data),
            (Method::Put, data) => send_body(with_headers(agent.put(&request.url), header), data),
            (other, _) => panic!("method {} not wired in the test transport", other.as_str()),
        }
        .expect("HTTP transport error");

        complete(Self::raw_response(&mut response, request.data_type));
        TaskHandle::new(())
    }

    fn issue_upload(&self, upload: TransportUpload, complete: Completion) -> TaskHandle {
        let boundary = "courier-test-boundary";
        let file_bytes = std::fs::read(&upload.file_path).expect("upload file readable");
        let file_name = Path::new(&upload.file_path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload.bin");

        let mut body: Vec<u8> = Vec::new();
        for (name, value) in &upload.form_data {
            body.extend_from_slice(
                format!(
                    "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                upload.name
            )
            .as_bytes(),
        );
        body.extend_from_slice(&file_bytes);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        let agent = Self::agent(None);
        let mut builder = agent
            .post(&upload.url)
            .content_type(format!("multipart/form-data; boundary={boundary}"));
        for (name, value) in &upload.header {
            builder = builder.header(name, value);
        }
        let mut response = builder.send(&body[..]).expect("HTTP transport error");

        // Uploads deliver text; JSON coercion is the pipeline's job.
        complete(Self::raw_response(&mut response, DataType::Text));
        TaskHandle::new(())
    }
}

/// Start the mock server on a random port and return its base URL.
fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });
    format!("http://{addr}")
}

fn client_for(base_url: &str) -> Client {
    let client = Client::new(Arc::new(UreqTransport));
    let base_url = base_url.to_string();
    client.set_config(move |mut config| {
        config.base_url = base_url;
        config.header.insert("x-app".to_string(), "courier".to_string());
        config
    });
    client
}

#[test]
fn get_merges_base_url_query_and_headers() {
    let client = client_for(&start_server());

    let mut params = Params::new();
    params.insert("a", "1");
    params.insert("b", "x y");
    let response = client.get("/echo", params).wait().unwrap();

    assert_eq!(response.status_code, 200);
    let echo = response.data.as_json().expect("json echo");
    assert_eq!(echo["method"], "GET");
    assert_eq!(echo["path"], "/echo");
    assert_eq!(echo["query"]["a"], "1");
    assert_eq!(echo["query"]["b"], "x y");
    assert_eq!(echo["headers"]["x-app"], "courier");
}

#[test]
fn post_sends_json_body() {
    let client = client_for(&start_server());

    let response = client
        .post("/echo", Body::Json(json!({"k": "v"})), RequestOptions::default())
        .wait()
        .unwrap();

    let echo = response.data.as_json().expect("json echo");
    assert_eq!(echo["method"], "POST");
    let body: serde_json::Value = serde_json::from_str(echo["body"].as_str().unwrap()).unwrap();
    assert_eq!(body, json!({"k": "v"}));
}

#[test]
fn interceptor_header_reaches_the_wire() {
    struct Stamp;

    impl Interceptor for Stamp {
        fn before_request(&self, mut d: RequestDescriptor) -> Outcome<RequestDescriptor> {
            d.header.insert("x-stamped".to_string(), "yes".to_string());
            Outcome::Proceed(d)
        }
    }

    let client = client_for(&start_server());
    client.intercept_request(Stamp);

    let response = client.get("/echo", Params::new()).wait().unwrap();
    let echo = response.data.as_json().expect("json echo");
    assert_eq!(echo["headers"]["x-stamped"], "yes");
}

#[test]
fn non_200_status_rejects_until_validator_is_widened() {
    let client = client_for(&start_server());

    let err = client
        .request(RequestOptions::new("/status/404"))
        .wait()
        .unwrap_err();
    match err {
        RequestError::Status(response) => assert_eq!(response.status_code, 404),
        other => panic!("expected Status, got {other:?}"),
    }

    client.set_validate_status(|status| status == 200 || status == 404);
    let response = client
        .request(RequestOptions::new("/status/404"))
        .wait()
        .unwrap();
    assert_eq!(response.status_code, 404);
}

#[test]
fn upload_roundtrip_coerces_reply_and_strips_content_type() {
    let client = client_for(&start_server());
    client.set_config(|mut config| {
        config
            .header
            .insert("Content-Type".to_string(), "application/json".to_string());
        config
    });

    let file_path = std::env::temp_dir().join(format!("courier-it-{}.bin", std::process::id()));
    std::fs::write(&file_path, b"abc").unwrap();

    let mut spec = UploadSpec::new(file_path.to_str().unwrap(), "file");
    spec.form_data.insert("kind".to_string(), "avatar".to_string());
    let response = client.upload("/upload", spec).wait().unwrap();
    std::fs::remove_file(&file_path).ok();

    assert_eq!(response.status_code, 200);
    // The server replies text/plain; the pipeline coerced it to JSON.
    let reply = response.data.as_json().expect("coerced json reply");
    assert_eq!(reply["field"], "file");
    assert_eq!(reply["size"], 3);
    assert_eq!(reply["form"]["kind"], "avatar");
}
