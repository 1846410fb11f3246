use glam::Vec2;
use hexaphone_core::TouchPoint;
use web_sys as web;

/// Client coordinates to canvas backing-store pixels.
#[inline]
pub fn client_to_canvas_px(client_x: f32, client_y: f32, canvas: &web::HtmlCanvasElement) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    let w = rect.width() as f32;
    let h = rect.height() as f32;
    if w <= 0.0 || h <= 0.0 {
        return Vec2::ZERO;
    }
    let x_css = client_x - rect.left() as f32;
    let y_css = client_y - rect.top() as f32;
    Vec2::new(
        x_css / w * canvas.width() as f32,
        y_css / h * canvas.height() as f32,
    )
}

#[inline]
pub fn mouse_canvas_px(ev: &web::MouseEvent, canvas: &web::HtmlCanvasElement) -> Vec2 {
    client_to_canvas_px(ev.client_x() as f32, ev.client_y() as f32, canvas)
}

/// Every touch of a list, in canvas pixels.
pub fn touch_points(list: &web::TouchList, canvas: &web::HtmlCanvasElement) -> Vec<TouchPoint> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .map(|t| {
            let p = client_to_canvas_px(t.client_x() as f32, t.client_y() as f32, canvas);
            TouchPoint {
                id: t.identifier(),
                x: p.x,
                y: p.y,
            }
        })
        .collect()
}

pub fn touch_ids(list: &web::TouchList) -> Vec<i32> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .map(|t| t.identifier())
        .collect()
}
