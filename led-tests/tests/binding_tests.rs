//! Integration Tests für LED Binding und JSON-Protokoll
//!
//! Diese Tests laufen auf dem Host (x86_64) und nutzen MockLedDriver

mod common;

use common::{MockLedDriver, PWM_LED_MUX, PWM_LEDS, TWO_LED_MUX, TWO_LEDS};
use led_core::{
    HandleId, LedBinding, LedController, LedError, LedReply, LedRequest, LedTable, LineBuffer,
    MuxRegistry, OwnerKey, PinOrigin, PwmChannel, parse_request, render_reply,
};

type TestBinding<const H: usize> =
    LedBinding<'static, MuxRegistry<'static, 8>, MockLedDriver, H>;

fn two_led_binding<const H: usize>() -> TestBinding<H> {
    LedBinding::new(LedController::new(
        LedTable::new(&TWO_LEDS),
        MuxRegistry::new(&TWO_LED_MUX),
        MockLedDriver::new(),
    ))
}

fn pwm_binding() -> TestBinding<4> {
    LedBinding::new(LedController::new(
        LedTable::new(&PWM_LEDS),
        MuxRegistry::new(&PWM_LED_MUX),
        MockLedDriver::with_pwm(&[PwmChannel(0), PwmChannel(1)], false),
    ))
}

fn parse(json: &str) -> Result<LedRequest, LedError> {
    parse_request(json.as_bytes())
}

fn render(reply: &LedReply) -> String {
    let mut buffer = [0u8; 128];
    let json = render_reply(reply, &mut buffer).unwrap();
    String::from_utf8(json.to_vec()).unwrap()
}

// ============================================================================
// Tests: Lifecycle
// ============================================================================

#[test]
fn test_construct_fills_slots() {
    let mut binding = two_led_binding::<2>();

    let first = binding.construct(1).unwrap();
    let second = binding.construct(2).unwrap();

    assert_eq!(first, HandleId(0));
    assert_eq!(second, HandleId(1));
    assert_eq!(binding.live_handles(), 2);
    assert_eq!(binding.handle(first).unwrap().to_string(), "LED(1)");
}

#[test]
fn test_construct_invalid_id_fails() {
    let mut binding = two_led_binding::<2>();

    assert_eq!(binding.construct(3), Err(LedError::InvalidLedId(3)));
    assert_eq!(binding.construct(0), Err(LedError::InvalidLedId(0)));
    assert_eq!(binding.live_handles(), 0);
}

#[test]
fn test_no_free_handle_claims_no_pin() {
    let mut binding = two_led_binding::<1>();
    binding.construct(1).unwrap();

    assert_eq!(binding.construct(2), Err(LedError::NoFreeHandle));
    assert_eq!(
        binding
            .controller()
            .registry()
            .claimed_by(&OwnerKey::new("led", 2, "-")),
        None
    );
    assert_eq!(binding.controller().registry().claim_count(), 1);
}

#[test]
fn test_destroy_is_idempotent() {
    let mut binding = two_led_binding::<2>();
    let handle = binding.construct(1).unwrap();

    binding.destroy(handle);
    binding.destroy(handle);
    binding.destroy(HandleId(200));

    assert_eq!(binding.live_handles(), 0);
    assert_eq!(binding.controller().registry().claim_count(), 0);

    // Slot und Registry-Schlüssel sind wieder frei
    let again = binding.construct(1).unwrap();
    assert_eq!(again.slot(), 0);
    assert_ne!(again, handle);
    assert_eq!(binding.handle(again).unwrap().origin(), PinOrigin::Registry);
}

#[test]
fn test_two_live_handles_same_led() {
    let mut binding = two_led_binding::<2>();

    let first = binding.construct(1).unwrap();
    let second = binding.construct(1).unwrap();

    assert_eq!(binding.handle(first).unwrap().origin(), PinOrigin::Registry);
    assert_eq!(
        binding.handle(second).unwrap().origin(),
        PinOrigin::StaticTable
    );
    assert!(binding.on(second).is_ok());
}

#[test]
fn test_stale_handle_is_noop() {
    let mut binding = two_led_binding::<2>();
    let handle = binding.construct(1).unwrap();
    binding.destroy(handle);
    let writes = binding.controller().driver().write_count;

    assert_eq!(binding.on(handle), Ok(()));
    assert_eq!(binding.off(handle), Ok(()));
    assert_eq!(binding.toggle(handle), Ok(()));
    assert_eq!(binding.set_intensity(handle, 128), Ok(()));
    assert_eq!(binding.intensity(handle), 0);
    assert_eq!(binding.on(HandleId(42)), Ok(()));

    assert_eq!(binding.controller().driver().write_count, writes);
}

#[test]
fn test_stale_handle_does_not_reach_reused_slot() {
    let mut binding = two_led_binding::<1>();
    let stale = binding.construct(1).unwrap();
    binding.destroy(stale);

    // Gleicher Slot, neue Generation
    assert_eq!(
        binding.dispatch(LedRequest::Construct { id: 2 }),
        LedReply::Handle { handle: 256 }
    );
    let live = HandleId::new(0, 1);
    assert_eq!(live.slot(), stale.slot());
    let writes = binding.controller().driver().write_count;

    assert_eq!(binding.on(stale), Ok(()));
    assert_eq!(binding.set_intensity(stale, 255), Ok(()));
    assert_eq!(binding.dispatch(LedRequest::Toggle(stale)), LedReply::Done);
    assert!(binding.handle(stale).is_none());
    binding.destroy(stale);

    assert_eq!(binding.controller().driver().write_count, writes);
    assert_eq!(binding.live_handles(), 1);
    assert_eq!(binding.controller().registry().claim_count(), 1);

    // Das neue Handle steuert weiterhin LED 2
    binding.on(live).unwrap();
    assert_eq!(
        binding.controller().driver().level_of(led_core::PinRef(11)),
        Some(led_core::PinState::Low)
    );
}

#[test]
fn test_handle_id_layout() {
    let handle = HandleId::new(3, 2);
    assert_eq!(handle, HandleId(0x0203));
    assert_eq!(handle.slot(), 3);
    assert_eq!(handle.generation(), 2);
    assert_eq!(HandleId(1).generation(), 0);
}

#[test]
fn test_set_intensity_saturates_raw_value() {
    let mut binding = two_led_binding::<2>();
    let handle = binding.construct(1).unwrap();

    binding.set_intensity(handle, 300).unwrap();
    let led = binding.handle(handle).unwrap();
    assert!(!led.is_pwm_active());
    let pin = led.pin();
    assert_eq!(
        binding.controller().driver().level_of(pin),
        Some(led_core::PinState::Low)
    );

    binding.set_intensity(handle, -5).unwrap();
    assert_eq!(
        binding.controller().driver().level_of(pin),
        Some(led_core::PinState::High)
    );
}

// ============================================================================
// Tests: dispatch()
// ============================================================================

#[test]
fn test_dispatch_sequence() {
    let mut binding = two_led_binding::<2>();

    assert_eq!(
        binding.dispatch(LedRequest::Construct { id: 1 }),
        LedReply::Handle { handle: 0 }
    );
    assert_eq!(binding.dispatch(LedRequest::On(HandleId(0))), LedReply::Done);
    assert_eq!(
        binding.dispatch(LedRequest::Toggle(HandleId(0))),
        LedReply::Done
    );
    assert_eq!(
        binding.dispatch(LedRequest::Intensity(HandleId(0))),
        LedReply::Intensity { value: 0 }
    );
    assert_eq!(
        binding.dispatch(LedRequest::Destroy(HandleId(0))),
        LedReply::Done
    );
}

#[test]
fn test_dispatch_error_reply() {
    let mut binding = two_led_binding::<2>();

    assert_eq!(
        binding.dispatch(LedRequest::Construct { id: 9 }),
        LedReply::Error {
            message: "LED does not exist"
        }
    );
}

#[test]
fn test_dispatch_pwm_then_toggle() {
    let mut binding = pwm_binding();
    let handle = binding.construct(1).unwrap();

    assert_eq!(
        binding.dispatch(LedRequest::SetIntensity(handle, 128)),
        LedReply::Done
    );
    assert!(binding.handle(handle).unwrap().is_pwm_active());

    assert_eq!(binding.dispatch(LedRequest::Toggle(handle)), LedReply::Done);
    assert!(!binding.handle(handle).unwrap().is_pwm_active());
    assert!(binding.controller().driver().pwm_duty.is_empty());
}

// ============================================================================
// Tests: JSON-Protokoll
// ============================================================================

#[test]
fn test_parse_requests() {
    assert_eq!(
        parse(r#"{"op":"construct","id":1}"#),
        Ok(LedRequest::Construct { id: 1 })
    );
    assert_eq!(
        parse(r#"{"op":"on","handle":0}"#),
        Ok(LedRequest::On(HandleId(0)))
    );
    assert_eq!(
        parse(r#"{"op":"intensity","handle":2}"#),
        Ok(LedRequest::Intensity(HandleId(2)))
    );
    assert_eq!(
        parse(r#"{"op":"intensity","handle":2,"value":128}"#),
        Ok(LedRequest::SetIntensity(HandleId(2), 128))
    );
    assert_eq!(
        parse(r#"{"op":"destroy","handle":1}"#),
        Ok(LedRequest::Destroy(HandleId(1)))
    );
}

#[test]
fn test_parse_malformed_requests() {
    assert_eq!(parse(r#"{"op":"on"}"#), Err(LedError::MalformedRequest));
    assert_eq!(parse(r#"{"op":"construct"}"#), Err(LedError::MalformedRequest));
    assert_eq!(
        parse(r#"{"op":"blink","handle":0}"#),
        Err(LedError::MalformedRequest)
    );
}

#[test]
fn test_render_replies() {
    assert_eq!(
        render(&LedReply::Handle { handle: 3 }),
        r#"{"type":"handle","handle":3}"#
    );
    assert_eq!(render(&LedReply::Done), r#"{"type":"done"}"#);
    assert_eq!(
        render(&LedReply::Intensity { value: 0 }),
        r#"{"type":"intensity","value":0}"#
    );
    assert_eq!(
        render(&LedReply::from(LedError::NoFreeHandle)),
        r#"{"type":"error","message":"no free handle"}"#
    );
}

#[test]
fn test_json_script() {
    let mut binding = two_led_binding::<2>();
    let script = [
        (r#"{"op":"construct","id":2}"#, r#"{"type":"handle","handle":0}"#),
        (r#"{"op":"on","handle":0}"#, r#"{"type":"done"}"#),
        (r#"{"op":"intensity","handle":0,"value":128}"#, r#"{"type":"done"}"#),
        (r#"{"op":"intensity","handle":0}"#, r#"{"type":"intensity","value":0}"#),
        (r#"{"op":"destroy","handle":0}"#, r#"{"type":"done"}"#),
        (
            r#"{"op":"construct","id":5}"#,
            r#"{"type":"error","message":"LED does not exist"}"#,
        ),
    ];

    for (request, expected) in script {
        let reply = match parse(request) {
            Ok(request) => binding.dispatch(request),
            Err(e) => LedReply::from(e),
        };
        assert_eq!(render(&reply), expected, "request: {request}");
    }
}

#[test]
fn test_render_reply_buffer_too_small() {
    let mut buffer = [0u8; 8];
    assert_eq!(render_reply(&LedReply::Handle { handle: 1 }, &mut buffer), None);
}

#[test]
fn test_line_transport_end_to_end() {
    let mut binding = two_led_binding::<2>();
    let mut lines = LineBuffer::<64>::new();
    let input = b"{\"op\":\"construct\",\"id\":1}\r\n\n{\"op\":\"toggle\",\"handle\":0}\n{\"op\":\"nope\"}\n";

    let replies: Vec<String> = input
        .iter()
        .filter_map(|&byte| lines.push(byte))
        .map(|parsed| match parsed {
            Ok(request) => binding.dispatch(request),
            Err(e) => LedReply::from(e),
        })
        .map(|reply| render(&reply))
        .collect();

    assert_eq!(
        replies,
        [
            r#"{"type":"handle","handle":0}"#,
            r#"{"type":"done"}"#,
            r#"{"type":"error","message":"malformed request"}"#,
        ]
    );
    // LED 1 ist active-low: nach dem Toggle liegt GPIO10 auf Low (an)
    assert_eq!(
        binding.controller().driver().level_of(led_core::PinRef(10)),
        Some(led_core::PinState::Low)
    );
}
