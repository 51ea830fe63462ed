use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, Clamped, JsCast, JsValue};
use web_sys::{
    window, CanvasRenderingContext2d, HtmlCanvasElement, ImageData, MouseEvent, WheelEvent, Window,
};

use crate::{buffer_extent, cell_css_size, WebScene};

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Run the scene on `canvas`: size it to the window, listen for resize,
/// wheel and mouse movement, and redraw on every animation frame.
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn start(canvas: HtmlCanvasElement) -> Result<(), JsValue> {
    let window = window().ok_or("no global window")?;
    let context: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or("2D canvas context not supported")?
        .dyn_into()?;

    let (width, height) = buffer_size(&window)?;
    canvas.set_width(width);
    canvas.set_height(height);
    let scene = Rc::new(RefCell::new(WebScene::new(width, height)));
    tracing::info!(width, height, "web scene started");

    // Resize the buffer with the window; CSS stretches it back to full size.
    {
        let scene = scene.clone();
        let canvas = canvas.clone();
        let on_resize = Closure::wrap(Box::new(move || {
            let Some(window) = web_sys::window() else {
                return;
            };
            match buffer_size(&window) {
                Ok((width, height)) => {
                    canvas.set_width(width);
                    canvas.set_height(height);
                    scene.borrow_mut().resize(width, height);
                }
                Err(err) => tracing::warn!(?err, "could not read window size"),
            }
        }) as Box<dyn FnMut()>);
        window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;
        on_resize.forget();
    }

    {
        let scene = scene.clone();
        let on_wheel = Closure::wrap(Box::new(move |event: WheelEvent| {
            scene.borrow_mut().wheel(event.delta_y() as f32);
        }) as Box<dyn FnMut(_)>);
        window.add_event_listener_with_callback("wheel", on_wheel.as_ref().unchecked_ref())?;
        on_wheel.forget();
    }

    {
        let scene = scene.clone();
        let on_mouse_move = Closure::wrap(Box::new(move |event: MouseEvent| {
            let ratio = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
            let cell = cell_css_size(ratio);
            let x = event.client_x() as f64 / cell;
            let y = event.client_y() as f64 / cell;
            scene.borrow_mut().pointer_move(x as f32, y as f32);
        }) as Box<dyn FnMut(_)>);
        window
            .add_event_listener_with_callback("mousemove", on_mouse_move.as_ref().unchecked_ref())?;
        on_mouse_move.forget();
    }

    // `f` holds the animation-frame closure so it can reschedule itself.
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();

    *g.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        let Some(window) = web_sys::window() else {
            return;
        };
        let now = window.performance().map(|p| p.now()).unwrap_or_default();

        {
            let mut scene = scene.borrow_mut();
            scene.frame(now);
            if let Err(err) = draw(&context, &scene) {
                tracing::error!(?err, "failed to draw frame");
            }
        }

        if let Err(err) = request_frame(&window, &f) {
            tracing::error!(?err, "failed to schedule next frame");
        }
    }) as Box<dyn FnMut()>));

    request_frame(&window, &g)
}

fn buffer_size(window: &Window) -> Result<(u32, u32), JsValue> {
    let width = window.inner_width()?.as_f64().unwrap_or_default();
    let height = window.inner_height()?.as_f64().unwrap_or_default();
    let ratio = window.device_pixel_ratio();
    Ok((buffer_extent(width, ratio), buffer_extent(height, ratio)))
}

fn draw(context: &CanvasRenderingContext2d, scene: &WebScene) -> Result<(), JsValue> {
    let image = ImageData::new_with_u8_clamped_array_and_sh(
        Clamped(scene.pixel_slice()),
        scene.width(),
        scene.height(),
    )?;
    context.clear_rect(0.0, 0.0, scene.width() as f64, scene.height() as f64);
    context.put_image_data(&image, 0.0, 0.0)
}

fn request_frame(window: &Window, callback: &FrameCallback) -> Result<(), JsValue> {
    let callback = callback.borrow();
    let closure = callback.as_ref().ok_or("animation callback missing")?;
    window.request_animation_frame(closure.as_ref().unchecked_ref())?;
    Ok(())
}
