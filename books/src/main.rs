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

//! Entry point to the books service.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use iii_iv_books::db::StorageOptions;
use iii_iv_books::{serve, wait_for_signal};
use iii_iv_core::env::get_optional_var_named;
use log::{error, info};
use std::net::Ipv4Addr;
use std::process;

/// Default port to listen on when `PORT` is not set.
const DEFAULT_PORT: u16 = 3000;

#[tokio::main]
async fn main() {
    env_logger::init();

    let port = match get_optional_var_named::<u16>("PORT") {
        Ok(port) => port.unwrap_or(DEFAULT_PORT),
        Err(e) => {
            error!("Invalid configuration: {}", e);
            process::exit(1);
        }
    };
    let addr = (Ipv4Addr::UNSPECIFIED, port);

    let storage_opts = match StorageOptions::from_env("BOOKS") {
        Ok(opts) => opts,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = serve(addr, storage_opts, wait_for_signal(tokio::signal::ctrl_c())).await {
        error!("Server failed: {}", e);
        process::exit(1);
    }
    info!("Server shut down");
}
