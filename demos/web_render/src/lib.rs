// Copyright 2026 the Fibril Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web example: a long list rendered into the DOM during idle periods.
//!
//! Builds a 2000-row list and hands it to a [`WorkLoop`] over a [`DomHost`].
//! [`drive`] ticks the loop from `requestIdleCallback`, so rows appear a few
//! at a time while the page stays responsive.
//!
//! Build with: `wasm-pack build --target web demos/web_render`
//!
//! Then serve `demos/web_render/` and open `index.html` in a browser.
//!
//! [`WorkLoop`]: fibril_core::scheduler::WorkLoop
//! [`DomHost`]: fibril_backend_web::DomHost
//! [`drive`]: fibril_backend_web::drive

#![no_std]
#![cfg_attr(
    not(target_arch = "wasm32"),
    allow(dead_code, reason = "this crate only runs in the browser")
)]

extern crate alloc;

use alloc::format;
use alloc::rc::Rc;
use core::cell::RefCell;

use wasm_bindgen::prelude::*;
use web_sys::{Document, Element as DomElement};

use fibril_backend_web::DomHost;
use fibril_core::element::{self, Child, Element, Props};
use fibril_core::scheduler::{SchedulerConfig, WorkLoop};

const ROWS: u32 = 2_000;

fn create_container(document: &Document) -> Result<DomElement, JsValue> {
    let container = document.create_element("div")?;
    container.set_id("root");
    Ok(container)
}

fn list() -> Element {
    element::build(
        "ul",
        Some(Props::new().with("className", "rows")),
        (0..ROWS).map(|i| {
            Child::from(element::build(
                "li",
                Some(Props::new().with("title", format!("row {i}"))),
                [Child::from("row "), Child::from(i)],
            ))
        }),
    )
}

/// Entry point, called automatically by `wasm_bindgen(start)`.
#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    let window = web_sys::window().expect("no global window");
    let document = window.document().expect("no document");

    let container = create_container(&document)?;
    document.body().expect("no body").append_child(&container)?;

    let mut work = WorkLoop::new(DomHost::new(document), SchedulerConfig::browser());
    work.render(list(), container.into());

    let idle = fibril_backend_web::drive(Rc::new(RefCell::new(work)), |err| {
        web_sys::console::error_1(&format!("{err}").into());
    });

    // Keep the idle loop alive for the lifetime of the page.
    core::mem::forget(idle);

    Ok(())
}
