// Task-Modul: Enthält alle Embassy Tasks
//
// Der LED Task besitzt das Binding. Console und Heartbeat sind Clients und
// kommunizieren nur über Embassy Channels mit ihm (Anfrage + eigener Rückkanal).

pub mod console;
pub mod heartbeat;
pub mod led_control;

// Re-export Tasks für einfachen Import
pub use console::console_task;
pub use heartbeat::heartbeat_task;
pub use led_control::led_control_task;
