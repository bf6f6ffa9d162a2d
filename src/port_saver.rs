use rocket::fairing::{Fairing, Info, Kind};
use rocket::{Orbit, Rocket};
use tokio::sync::{mpsc, Mutex, OnceCell};

/// A fairing/handle pair reporting the port Rocket actually bound to, so
/// a server configured with port 0 can be reached.
pub fn create_pair() -> (PortSaver, Port) {
    let (tx, rx) = mpsc::channel(1);
    let port_saver = PortSaver::new(tx);
    let port = Port::new(rx);
    (port_saver, port)
}

pub struct Port {
    port: OnceCell<u16>,
    rx: Mutex<mpsc::Receiver<u16>>,
}

impl Port {
    fn new(rx: mpsc::Receiver<u16>) -> Port {
        Port {
            port: OnceCell::new(),
            rx: Mutex::new(rx),
        }
    }

    /// Waits for liftoff on first call. `None` if the server was dropped
    /// before it started listening.
    pub async fn get(&self) -> Option<u16> {
        self.port
            .get_or_try_init(|| async {
                let mut rx = self.rx.lock().await;
                rx.recv().await.ok_or(())
            })
            .await
            .ok()
            .copied()
    }
}

pub struct PortSaver {
    sender: mpsc::Sender<u16>,
}

impl PortSaver {
    fn new(sender: mpsc::Sender<u16>) -> PortSaver {
        PortSaver { sender }
    }
}

#[rocket::async_trait]
impl Fairing for PortSaver {
    fn info(&self) -> Info {
        Info {
            name: "Port Saver",
            kind: Kind::Liftoff,
        }
    }

    async fn on_liftoff(&self, rocket: &Rocket<Orbit>) {
        let port = rocket.config().port;
        tracing::info!(port, "Server is listening");
        if self.sender.send(port).await.is_err() {
            tracing::warn!("Nobody is waiting for the bound port");
        }
    }
}
