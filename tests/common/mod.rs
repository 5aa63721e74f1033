//! Scripted appliance for driving the RPC session without a network.
//!
//! Responses are served from a FIFO queue first; once the queue is empty,
//! per-`service.method` fixtures answer. Anything else gets HTTP 404.

#![allow(dead_code)]

use omv_rest::error::Result;
use omv_rest::omv::{Connection, Connector, CookieJar, Openmediavault, RawResponse};
use secrecy::SecretString;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

pub const SESSION_COOKIE: &str = "X-OPENMEDIAVAULT-SESSIONID";

/// One request as seen by the scripted appliance.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub body: Value,
    pub cookie: Option<String>,
}

impl Recorded {
    pub fn call(&self) -> String {
        format!(
            "{}.{}",
            self.body["service"].as_str().unwrap_or_default(),
            self.body["method"].as_str().unwrap_or_default()
        )
    }
}

#[derive(Default)]
struct ScriptState {
    queue: VecDeque<RawResponse>,
    fixtures: HashMap<String, RawResponse>,
    requests: Vec<Recorded>,
    connects: usize,
}

#[derive(Clone, Default)]
pub struct Script {
    state: Arc<Mutex<ScriptState>>,
}

impl Script {
    pub fn new() -> Self {
        Self::default()
    }

    /// A healthy appliance answering every telemetry call from fixtures.
    pub fn appliance() -> Self {
        let script = Self::new();
        script.fixture("session.login", login_ok("abc123"));
        script.fixture("session.logout", data(Value::Null));
        script.fixture("System.getInformation", data(system_information()));
        script.fixture("FileSystemMgmt.enumerateFilesystems", data(filesystems()));
        script.fixture("Smart.enumerateDevices", data(smart_devices()));
        script.fixture("RaidMgmt.enumerateDevices", data(raid_devices()));
        script.fixture("DiskMgmt.enumerateDevices", data(disk_devices()));
        script.fixture("Health.getHealthInfo", data(health_sensors()));
        script.fixture("services.getStatus", data(services()));
        script
    }

    pub fn push(&self, response: RawResponse) -> &Self {
        self.state.lock().unwrap().queue.push_back(response);
        self
    }

    pub fn fixture(&self, call: &str, response: RawResponse) -> &Self {
        self.state
            .lock()
            .unwrap()
            .fixtures
            .insert(call.to_string(), response);
        self
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.requests().iter().map(Recorded::call).collect()
    }

    pub fn connects(&self) -> usize {
        self.state.lock().unwrap().connects
    }

    pub fn clear_requests(&self) {
        self.state.lock().unwrap().requests.clear();
    }

    pub fn connector(&self) -> ScriptedConnector {
        ScriptedConnector {
            script: self.clone(),
        }
    }

    pub fn client(&self) -> Openmediavault<ScriptedConnector> {
        Openmediavault::with_connector(
            self.connector(),
            "admin",
            SecretString::from("openmediavault"),
        )
    }

    fn respond(&self, body: String, cookies: Option<&CookieJar>) -> RawResponse {
        let body: Value = serde_json::from_str(&body).expect("client sent invalid JSON");
        let recorded = Recorded {
            body,
            cookie: cookies.map(CookieJar::header_value),
        };
        let call = recorded.call();

        let mut state = self.state.lock().unwrap();
        state.requests.push(recorded);
        if let Some(response) = state.queue.pop_front() {
            return response;
        }
        state.fixtures.get(&call).cloned().unwrap_or(RawResponse {
            status: 404,
            set_cookies: Vec::new(),
            body: String::new(),
        })
    }
}

pub struct ScriptedConnector {
    script: Script,
}

impl Connector for ScriptedConnector {
    type Connection = ScriptedConnection;

    fn connect(&self) -> Result<ScriptedConnection> {
        self.script.state.lock().unwrap().connects += 1;
        Ok(ScriptedConnection {
            script: self.script.clone(),
        })
    }
}

pub struct ScriptedConnection {
    script: Script,
}

impl Connection for ScriptedConnection {
    async fn post(&self, body: String, cookies: Option<&CookieJar>) -> Result<RawResponse> {
        Ok(self.script.respond(body, cookies))
    }
}

pub fn login_ok(session_id: &str) -> RawResponse {
    RawResponse {
        status: 200,
        set_cookies: vec![format!(
            "{}={}; path=/; HttpOnly",
            SESSION_COOKIE, session_id
        )],
        body: json!({
            "response": {"authenticated": true, "username": "admin", "permissions": {"role": "admin"}},
            "error": null
        })
        .to_string(),
    }
}

pub fn login_rejected() -> RawResponse {
    RawResponse {
        status: 200,
        set_cookies: Vec::new(),
        body: json!({"response": {"authenticated": false}, "error": null}).to_string(),
    }
}

pub fn data(response: Value) -> RawResponse {
    RawResponse {
        status: 200,
        set_cookies: Vec::new(),
        body: json!({"response": response, "error": null}).to_string(),
    }
}

pub fn rpc_error(code: i64, message: &str) -> RawResponse {
    RawResponse {
        status: 200,
        set_cookies: Vec::new(),
        body: json!({
            "response": null,
            "error": {"code": code, "message": message, "trace": "#0 {main}"}
        })
        .to_string(),
    }
}

pub fn http_status(status: u16) -> RawResponse {
    RawResponse {
        status,
        set_cookies: Vec::new(),
        body: "<html>error</html>".to_string(),
    }
}

pub fn system_information() -> Value {
    json!({
        "hostname": "nas",
        "version": "6.9.1-1 (Shaitan)",
        "cpuModelName": "Intel(R) Celeron(R) J4125 CPU @ 2.00GHz",
        "kernel": "Linux 6.1.0-18-amd64",
        "time": "Sun 18 Oct 2026 10:00:00 AM CEST",
        "uptime": 86400,
        "loadAverage": {"1min": 0.12, "5min": 0.2, "15min": 0.25},
        "cpuUsage": 3.5,
        "memTotal": "8130224",
        "memFree": "6021904",
        "memUsed": "2108320",
        "configDirty": false,
        "rebootRequired": true,
        "pkgUpdatesAvailable": 4
    })
}

pub fn filesystems() -> Value {
    json!([
        {
            "devicefile": "/dev/md0",
            "parentdevicefile": "/dev/md0",
            "type": "ext4",
            "label": "data",
            "mountpoint": "/srv/dev-disk-by-label-data",
            "size": "1000000000000",
            "available": "400000000000",
            "mounted": true
        },
        {
            "devicefile": "/dev/sdc1",
            "parentdevicefile": "/dev/sdc",
            "type": "ext4",
            "label": "backup",
            "size": "500000000000",
            "available": "100000000000",
            "mounted": true
        },
        {
            "devicefile": "/dev/sdd1",
            "parentdevicefile": "/dev/sdd",
            "type": "xfs",
            "size": "200000000000",
            "available": "100000000000",
            "mounted": false
        }
    ])
}

pub fn smart_devices() -> Value {
    json!([
        {"devicefile": "/dev/sda", "model": "WDC WD40EFRX", "overallstatus": "GOOD", "temperature": "35 C"},
        {"devicefile": "/dev/sdb", "model": "WDC WD40EFRX", "overallstatus": "GOOD"},
        {"devicefile": "/dev/sdc", "model": "ST2000VN004", "overallstatus": "BAD_SECTOR", "temperature": "41°C"},
        {"devicefile": "/dev/sdd", "model": "ST1000DM010", "overallstatus": "GOOD", "temperature": "30°C"}
    ])
}

pub fn raid_devices() -> Value {
    json!([
        {
            "devicefile": "/dev/md0",
            "name": "nas:data",
            "devices": ["/dev/sda1", "/dev/sdb1"],
            "state": "clean",
            "level": "raid1"
        }
    ])
}

pub fn disk_devices() -> Value {
    json!([
        {"devicefile": "/dev/sda", "model": "WDC WD40EFRX", "size": "4000787030016"},
        {"devicefile": "/dev/sdb", "model": "WDC WD40EFRX", "size": "4000787030016"},
        {"devicefile": "/dev/sdc", "model": "ST2000VN004", "size": "2000398934016"},
        {"devicefile": "/dev/sdd", "model": "ST1000DM010", "size": "1000204886016"}
    ])
}

pub fn health_sensors() -> Value {
    json!([
        {"name": "CPU Fan", "index": 1, "value": 1200},
        {"name": "System temperature", "index": 2, "value": 42}
    ])
}

pub fn services() -> Value {
    json!({
        "total": 2,
        "data": [
            {"name": "ssh", "title": "SSH", "enabled": true, "running": true},
            {"name": "nfs", "title": "NFS", "enabled": false, "running": false}
        ]
    })
}
