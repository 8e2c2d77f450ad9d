// Museum walk: WASD + mouse-look navigation through a corridor and its rooms,
// with dwell-to-enter doors. The engine module is the navigation core; the
// binary wires it to a window.

pub mod engine;
