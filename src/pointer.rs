pub const RIPPLE_LIFETIME_MS: u32 = 600;
pub const PARALLAX_FACTOR: f64 = 0.3;
pub const TILT_RANGE_DEG: f64 = 10.0;
pub const TILT_IMAGE_DEPTH: f64 = 1.2;

/// Client-space rectangle, as reported by `getBoundingClientRect`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Drops the sign of negative zero so CSS values never read `-0`.
fn css_number(value: f64) -> f64 {
    value + 0.0
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RippleGeometry {
    pub diameter: f64,
    pub left: f64,
    pub top: f64,
}

impl RippleGeometry {
    /// `client_width`/`client_height` size the circle; `rect` positions the
    /// click relative to the element so the circle is centred on it.
    pub fn compute(
        rect: Bounds,
        client_width: f64,
        client_height: f64,
        click_x: f64,
        click_y: f64,
    ) -> Self {
        let diameter = client_width.max(client_height);
        let radius = diameter / 2.0;

        Self {
            diameter,
            left: click_x - rect.left - radius,
            top: click_y - rect.top - radius,
        }
    }

    pub fn style_pairs(&self) -> [(&'static str, String); 4] {
        let size = format!("{}px", css_number(self.diameter));
        [
            ("width", size.clone()),
            ("height", size),
            ("left", format!("{}px", css_number(self.left))),
            ("top", format!("{}px", css_number(self.top))),
        ]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RippleId(u64);

/// At most one live ripple per host element.
#[derive(Debug)]
pub struct RippleSlot<T> {
    next_id: u64,
    current: Option<(RippleId, T)>,
}

impl<T> Default for RippleSlot<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            current: None,
        }
    }
}

impl<T> RippleSlot<T> {
    /// Installs `ripple` and hands back the one it displaced, which the
    /// caller must detach immediately.
    pub fn replace(&mut self, ripple: T) -> (RippleId, Option<T>) {
        let id = RippleId(self.next_id);
        self.next_id += 1;
        let previous = self.current.replace((id, ripple)).map(|(_, ripple)| ripple);
        (id, previous)
    }

    /// Returns the ripple for `id` if it is still the live one.
    pub fn expire(&mut self, id: RippleId) -> Option<T> {
        match &self.current {
            Some((current_id, _)) if *current_id == id => {
                self.current.take().map(|(_, ripple)| ripple)
            }
            _ => None,
        }
    }

    #[cfg(test)]
    fn live(&self) -> usize {
        usize::from(self.current.is_some())
    }
}

/// A ripple that can take itself off the page.
pub trait Detach {
    fn detach(&self);
}

impl<T: Detach> RippleSlot<T> {
    /// Makes `ripple` the live one and detaches whatever it displaced.
    pub fn install(&mut self, ripple: T) -> RippleId {
        let (id, displaced) = self.replace(ripple);
        if let Some(displaced) = displaced {
            displaced.detach();
        }
        id
    }

    /// Detaches the ripple for `id` if it is still the live one. Stale ids
    /// from displaced ripples are ignored.
    pub fn retire(&mut self, id: RippleId) {
        if let Some(ripple) = self.expire(id) {
            ripple.detach();
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TiltAngles {
    pub rotate_x: f64,
    pub rotate_y: f64,
}

impl TiltAngles {
    /// `None` when the hero has collapsed to zero size.
    pub fn from_pointer(bounds: Bounds, client_x: f64, client_y: f64) -> Option<Self> {
        if bounds.width <= 0.0 || bounds.height <= 0.0 {
            return None;
        }

        let x_ratio = (client_x - bounds.left) / bounds.width - 0.5;
        let y_ratio = (client_y - bounds.top) / bounds.height - 0.5;

        Some(Self {
            rotate_x: y_ratio * TILT_RANGE_DEG,
            rotate_y: -x_ratio * TILT_RANGE_DEG,
        })
    }

    fn transform(rotate_x: f64, rotate_y: f64) -> String {
        format!(
            "rotateX({}deg) rotateY({}deg)",
            css_number(rotate_x),
            css_number(rotate_y)
        )
    }

    pub fn content_transform(&self) -> String {
        Self::transform(self.rotate_x, self.rotate_y)
    }

    pub fn image_transform(&self) -> String {
        Self::transform(
            self.rotate_x * TILT_IMAGE_DEPTH,
            self.rotate_y * TILT_IMAGE_DEPTH,
        )
    }
}

pub fn parallax_position(scroll_y: f64) -> String {
    format!("{}px", css_number(scroll_y * PARALLAX_FACTOR))
}

/// Percentage of the scrollable height already scrolled past.
pub fn scroll_progress(scroll_y: f64, scroll_height: f64, viewport_height: f64) -> f64 {
    let scrollable = scroll_height - viewport_height;
    if scrollable > 0.0 {
        scroll_y / scrollable * 100.0
    } else {
        0.0
    }
}

pub fn scroll_progress_width(scroll_y: f64, scroll_height: f64, viewport_height: f64) -> String {
    format!(
        "{}%",
        css_number(scroll_progress(scroll_y, scroll_height, viewport_height))
    )
}

/// Last known pointer position for the cursor follower.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CursorState {
    x: f64,
    y: f64,
}

impl CursorState {
    #[cfg(test)]
    fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    pub fn update(&mut self, x: f64, y: f64) -> String {
        self.x = x;
        self.y = y;
        self.transform()
    }

    pub fn transform(&self) -> String {
        format!(
            "translate({}px, {}px)",
            css_number(self.x),
            css_number(self.y)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::RefCell, rc::Rc};

    fn button_bounds() -> Bounds {
        Bounds {
            left: 100.0,
            top: 50.0,
            width: 120.0,
            height: 40.0,
        }
    }

    #[test]
    fn ripple_is_sized_by_the_larger_side_and_centred_on_the_click() {
        let geometry = RippleGeometry::compute(button_bounds(), 120.0, 40.0, 130.0, 70.0);

        assert_eq!(geometry.diameter, 120.0);
        assert_eq!(geometry.left, -30.0);
        assert_eq!(geometry.top, -40.0);
        assert_eq!(
            geometry.style_pairs(),
            [
                ("width", "120px".to_string()),
                ("height", "120px".to_string()),
                ("left", "-30px".to_string()),
                ("top", "-40px".to_string()),
            ]
        );
    }

    #[test]
    fn rapid_clicks_keep_a_single_live_ripple() {
        let mut slot = RippleSlot::default();

        let (first, displaced) = slot.replace("ripple-1");
        assert_eq!(displaced, None);
        assert_eq!(slot.live(), 1);

        let (second, displaced) = slot.replace("ripple-2");
        assert_eq!(displaced, Some("ripple-1"));
        assert_eq!(slot.live(), 1);

        assert_eq!(slot.expire(first), None);
        assert_eq!(slot.live(), 1);

        assert_eq!(slot.expire(second), Some("ripple-2"));
        assert_eq!(slot.live(), 0);
    }

    /// Stands in for a circle element appended to the button.
    struct AttachedRipple {
        id: u32,
        host: Rc<RefCell<Vec<u32>>>,
    }

    impl AttachedRipple {
        fn append(id: u32, host: &Rc<RefCell<Vec<u32>>>) -> Self {
            host.borrow_mut().push(id);
            Self {
                id,
                host: Rc::clone(host),
            }
        }
    }

    impl Detach for AttachedRipple {
        fn detach(&self) {
            self.host.borrow_mut().retain(|child| *child != self.id);
        }
    }

    #[test]
    fn rapid_clicks_leave_one_circle_on_the_button() {
        let host = Rc::new(RefCell::new(Vec::new()));
        let mut slot = RippleSlot::default();

        let mut ids = Vec::new();
        for click in 1..=3 {
            ids.push(slot.install(AttachedRipple::append(click, &host)));
            assert_eq!(*host.borrow(), vec![click]);
        }

        // Timers for displaced ripples fire without touching the live one.
        slot.retire(ids[0]);
        slot.retire(ids[1]);
        assert_eq!(*host.borrow(), vec![3]);
        assert_eq!(slot.live(), 1);

        slot.retire(ids[2]);
        assert!(host.borrow().is_empty());
        assert_eq!(slot.live(), 0);
    }

    #[test]
    fn tilt_is_zero_at_the_centre() {
        let angles = TiltAngles::from_pointer(button_bounds(), 160.0, 70.0).expect("sized");
        assert_eq!(angles.content_transform(), "rotateX(0deg) rotateY(0deg)");
    }

    #[test]
    fn tilt_peaks_at_five_degrees_in_the_corner() {
        let angles = TiltAngles::from_pointer(button_bounds(), 100.0, 90.0).expect("sized");

        assert_eq!(angles.rotate_x, 5.0);
        assert_eq!(angles.rotate_y, 5.0);
        assert_eq!(angles.content_transform(), "rotateX(5deg) rotateY(5deg)");
        assert_eq!(angles.image_transform(), "rotateX(6deg) rotateY(6deg)");
    }

    #[test]
    fn tilt_skips_collapsed_bounds() {
        let bounds = Bounds {
            width: 0.0,
            ..button_bounds()
        };
        assert!(TiltAngles::from_pointer(bounds, 10.0, 10.0).is_none());
    }

    #[test]
    fn parallax_moves_at_three_tenths_of_the_scroll() {
        assert_eq!(parallax_position(0.0), "0px");
        assert_eq!(parallax_position(200.0), "60px");
    }

    #[test]
    fn scroll_progress_handles_short_documents() {
        assert_eq!(scroll_progress_width(250.0, 1_500.0, 1_000.0), "50%");
        assert_eq!(scroll_progress_width(0.0, 600.0, 900.0), "0%");
    }

    #[test]
    fn cursor_state_tracks_the_latest_pointer() {
        let mut cursor = CursorState::default();
        assert_eq!(cursor.transform(), "translate(0px, 0px)");

        assert_eq!(cursor.update(12.0, 48.5), "translate(12px, 48.5px)");
        assert_eq!(cursor.position(), (12.0, 48.5));
    }
}
