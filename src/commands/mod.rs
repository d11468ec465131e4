// ============================================================================
// Tauri command surface
// ============================================================================

pub mod schedule;
