//! Host package for the workspace-level integration tests in `tests/`.
