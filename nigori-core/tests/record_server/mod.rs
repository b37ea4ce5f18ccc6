// A minimal in-memory record store used only to drive the integration
// test below; it is not the persistence layer, which remains out of scope.
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use nigori_crypto::codec::bin2int;
use nigori_crypto::schnorr::{SchnorrVerifier, Signature};
use serde_json::json;
use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::sync::Mutex;
use std::thread;
use std::time::{SystemTime, UNIX_EPOCH};
use tiny_http::{Method, Response, Server};
use url::form_urlencoded;

struct State {
	users: HashMap<String, Vec<u8>>,
	seen_tokens: HashSet<String>,
	records: HashMap<Vec<u8>, Vec<(u64, Vec<u8>)>>,
}

/// Starts the mock server on a random local port and returns its base URL.
pub fn server() -> String {
	let server = Server::http("127.0.0.1:0").unwrap();
	let addr = server.server_addr().to_string();
	let state = Mutex::new(State {
		users: HashMap::new(),
		seen_tokens: HashSet::new(),
		records: HashMap::new(),
	});

	thread::spawn(move || {
		for mut request in server.incoming_requests() {
			let url = request.url().to_string();
			let (path, query) = url.split_once('?').unwrap_or((url.as_str(), ""));

			let params: HashMap<String, String> = match request.method() {
				Method::Post => {
					let mut body = String::new();
					request.as_reader().read_to_string(&mut body).unwrap();
					form_urlencoded::parse(body.as_bytes()).into_owned().collect()
				},
				Method::Get => form_urlencoded::parse(query.as_bytes()).into_owned().collect(),
				_ => HashMap::new(),
			};

			let mut state = state.lock().unwrap();
			let (status, body) = handle(path, &params, &mut state);
			let response = Response::from_string(body).with_status_code(status);
			request.respond(response).unwrap();
		}
	});

	format!("http://{addr}")
}

fn handle(path: &str, params: &HashMap<String, String>, state: &mut State) -> (u16, String) {
	match path {
		"/register" => {
			let user = params["user"].clone();
			let public_key = URL_SAFE_NO_PAD.decode(&params["publicKey"]).unwrap();
			state.users.insert(user, public_key);
			(200, json!({}).to_string())
		},
		"/authenticate" => match verify_auth(params, state) {
			Ok(()) => (200, json!({}).to_string()),
			Err(status_and_reason) => status_and_reason,
		},
		"/add-resource" => match verify_auth(params, state) {
			Ok(()) => {
				let name = URL_SAFE_NO_PAD.decode(&params["name"]).unwrap();
				let value = URL_SAFE_NO_PAD.decode(&params["value"]).unwrap();
				let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs();
				state.records.entry(name).or_default().push((now, value));
				(200, json!({}).to_string())
			},
			Err(status_and_reason) => status_and_reason,
		},
		"/list-resource" => match verify_auth(params, state) {
			Ok(()) => {
				let name = URL_SAFE_NO_PAD.decode(&params["name"]).unwrap();
				let versions = state.records.get(&name).cloned().unwrap_or_default();
				let entries: Vec<_> = versions
					.iter()
					.enumerate()
					.map(|(i, (time, value))| {
						json!({
							"version": i as u32,
							"creationTime": time,
							"value": URL_SAFE_NO_PAD.encode(value),
						})
					})
					.collect();
				(200, serde_json::Value::Array(entries).to_string())
			},
			Err(status_and_reason) => status_and_reason,
		},
		"/get-resource" => {
			let name = URL_SAFE_NO_PAD.decode(&params["name"]).unwrap();
			let versions = match state.records.get(&name) {
				Some(v) if !v.is_empty() => v,
				_ => return (404, json!({"error": "no such record"}).to_string()),
			};
			let requested = params.get("version").and_then(|v| v.parse::<usize>().ok()).unwrap_or(versions.len() - 1);
			let (time, value) = &versions[requested];

			(
				200,
				json!({
					"version": requested as u32,
					"totalVersions": versions.len() as u32,
					"creationTime": time,
					"value": URL_SAFE_NO_PAD.encode(value),
				})
				.to_string(),
			)
		},
		_ => (404, json!({"error": "no such endpoint"}).to_string()),
	}
}

fn verify_auth(params: &HashMap<String, String>, state: &mut State) -> Result<(), (u16, String)> {
	let user = &params["user"];
	let t = &params["t"];
	let e = URL_SAFE_NO_PAD.decode(&params["e"]).unwrap();
	let s = URL_SAFE_NO_PAD.decode(&params["s"]).unwrap();

	let public_key = state.users.get(user).cloned().ok_or_else(|| (401, json!({"error": "unknown user"}).to_string()))?;
	let verifier = SchnorrVerifier::new(bin2int(&public_key));
	let signature = Signature {
		e: e.clone().try_into().map_err(|_| (401, json!({"error": "bad signature"}).to_string()))?,
		s,
	};

	if verifier.verify(t.as_bytes(), &signature).is_err() {
		return Err((401, json!({"error": "Signature doesn't verify"}).to_string()));
	}

	let token_key = format!("{user}:{t}");
	if !state.seen_tokens.insert(token_key) {
		return Err((401, json!({"error": "This is a replay"}).to_string()));
	}

	Ok(())
}
