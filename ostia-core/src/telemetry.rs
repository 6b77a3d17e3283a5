use ostia_shared::models::events::{
    ReservationReleasedEvent, SpotReservedEvent, VehicleCheckedInEvent, VehicleCheckedOutEvent,
};

/// Sink for lot lifecycle events. Emission is fire-and-forget; a sink must
/// never fail the operation that produced the event.
pub trait TelemetrySink: Send + Sync {
    fn record_check_in(&self, event: &VehicleCheckedInEvent);
    fn record_check_out(&self, event: &VehicleCheckedOutEvent);
    fn record_reservation(&self, event: &SpotReservedEvent);
    fn record_release(&self, event: &ReservationReleasedEvent);
}

/// Emits every lot event as a structured tracing line.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingTelemetry;

impl TracingTelemetry {
    fn publish<T: serde::Serialize>(&self, event_type: &str, payload: &T) {
        match serde_json::to_string(payload) {
            Ok(json) => tracing::info!(event = event_type, payload = %json, "lot event"),
            Err(e) => tracing::warn!(event = event_type, "failed to serialize event: {}", e),
        }
    }
}

impl TelemetrySink for TracingTelemetry {
    fn record_check_in(&self, event: &VehicleCheckedInEvent) {
        self.publish("vehicle_checked_in", event);
    }

    fn record_check_out(&self, event: &VehicleCheckedOutEvent) {
        self.publish("vehicle_checked_out", event);
    }

    fn record_reservation(&self, event: &SpotReservedEvent) {
        self.publish("spot_reserved", event);
    }

    fn record_release(&self, event: &ReservationReleasedEvent) {
        self.publish("reservation_released", event);
    }
}
