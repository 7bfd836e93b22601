//! End-to-end sessions across the bridge, driver loop, router model, and env.

#[cfg(test)]
mod protocol_e2e;

#[cfg(test)]
mod session_e2e;

#[cfg(test)]
fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
