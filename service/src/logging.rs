/*
 * Copyright (c) 2021 gematik GmbH
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *    http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 *
 */

use std::path::Path;

use log::{info, LevelFilter};
use log4rs::{
    append::console::ConsoleAppender,
    config::{Appender, Config, Logger, Root},
    file::Deserializers,
    init_config, load_config_file,
};

use crate::error::Error;

/// Log target of every message this crate emits, lifecycle events included.
pub const LOG_TARGET: &str = "rx_lifecycle_service";

/// Initializes log4rs from the passed config file. Falls back to a console
/// setup that raises the crate's own target to debug when the file can not
/// be loaded.
pub fn init_logger(config: &Path) -> Result<(), Error> {
    let config =
        load_config_file(config, Deserializers::default()).or_else(|_| create_default_config())?;

    init_config(config)?;
    info!(target: LOG_TARGET, "logging initialized");

    Ok(())
}

fn create_default_config() -> Result<Config, Error> {
    let stdout = ConsoleAppender::builder().build();

    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .logger(Logger::builder().build(LOG_TARGET, LevelFilter::Debug))
        .build(Root::builder().appender("stdout").build(LevelFilter::Info))?;

    Ok(config)
}
