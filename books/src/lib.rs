// III-IV
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Sample REST service that manages a collection of books.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use futures::Future;
use log::{error, info};
use std::error::Error;
use std::net::SocketAddr;
use tokio::net::TcpListener;

pub mod db;
use db::StorageOptions;
pub(crate) mod driver;
use driver::Driver;
pub(crate) mod model;
mod rest;
use rest::app;

/// Instantiates all resources to serve the application on `bind_addr` until `shutdown` completes.
///
/// In-flight requests are allowed to finish once `shutdown` fires, and the storage is closed
/// before returning.
///
/// While it'd be nice to push this responsibility to `main`, doing so would force us to expose many
/// crate-internal types to the public, which in turn would make dead code detection harder.
pub async fn serve<F>(
    bind_addr: impl Into<SocketAddr>,
    storage_opts: StorageOptions,
    shutdown: F,
) -> Result<(), Box<dyn Error>>
where
    F: Future<Output = ()> + Send + 'static,
{
    let store = db::open(storage_opts).await?;
    let driver = Driver::new(store.clone());
    let app = app(driver);

    let listener = TcpListener::bind(bind_addr.into()).await?;
    info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    info!("Server stopped accepting connections");

    store.close().await;
    Ok(())
}

/// Waits until `signal` fires, which is meant to be a future like `tokio::signal::ctrl_c()`.
///
/// If the signal handler cannot be installed, this never returns so that the server keeps running
/// instead of shutting down right after startup.
pub async fn wait_for_signal<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    match signal.await {
        Ok(()) => info!("Interrupt received; shutting down"),
        Err(e) => {
            error!("Cannot listen for interrupts: {}", e);
            std::future::pending::<()>().await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::net::Ipv4Addr;
    use std::time::Duration;

    #[tokio::test]
    async fn test_serve_stops_on_shutdown() {
        let _can_fail = env_logger::builder().is_test(true).try_init();

        serve((Ipv4Addr::LOCALHOST, 0), StorageOptions::Memory, async {}).await.unwrap();
    }

    #[tokio::test]
    async fn test_serve_with_sqlite() {
        let _can_fail = env_logger::builder().is_test(true).try_init();

        let opts = StorageOptions::Sqlite(":memory:".to_owned());
        serve((Ipv4Addr::LOCALHOST, 0), opts, async {}).await.unwrap();
    }

    #[tokio::test]
    async fn test_serve_bad_storage() {
        let _can_fail = env_logger::builder().is_test(true).try_init();

        let opts = StorageOptions::Sqlite("/nonexistent/directory/books.db".to_owned());
        assert!(serve((Ipv4Addr::LOCALHOST, 0), opts, async {}).await.is_err());
    }

    #[tokio::test]
    async fn test_wait_for_signal_returns_on_signal() {
        let _can_fail = env_logger::builder().is_test(true).try_init();

        wait_for_signal(async { Ok(()) }).await;
    }

    #[tokio::test]
    async fn test_wait_for_signal_blocks_when_handler_fails() {
        let _can_fail = env_logger::builder().is_test(true).try_init();

        let signal = async { Err(io::Error::other("no signal support")) };
        let result = tokio::time::timeout(Duration::from_millis(50), wait_for_signal(signal)).await;
        assert!(result.is_err(), "Shutdown must not be triggered by a failed signal handler");
    }
}
