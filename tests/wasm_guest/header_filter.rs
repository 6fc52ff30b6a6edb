use proxy_wasm_link::{ Action, EmulatorOptions, HostEmulator, LogLevel, WasmGuest };
use crate::fixture_loading::{ guest, ENGINE };

fn emulator( options: EmulatorOptions ) -> HostEmulator<WasmGuest> {
	let mut host = HostEmulator::with_options( guest( &ENGINE, fixture_path!( "header_filter.wat" )), options );
	assert!( host.start_plugin().expect( "failed to start plugin" ));
	host
}

#[test]
fn guest_edits_request_headers() {
	let mut host = emulator( EmulatorOptions::new() );
	let stream = host.initialize_http_context().expect( "stream" );

	let action = host.call_on_request_headers( stream, [( ":path", "/" )], true ).expect( "headers" );

	assert_eq!( action, Action::Continue );
	assert_eq!( host.get_current_request_headers( stream ).get( "x-wasm" ), Some( "on" ));
	assert_eq!( host.get_logs( LogLevel::Info ), [ "request headers seen" ]);
}

#[test]
fn guest_buffers_the_request_body() {
	let mut host = emulator( EmulatorOptions::new() );
	let stream = host.initialize_http_context().expect( "stream" );
	host.call_on_request_headers( stream, [( ":path", "/upload" )], false ).expect( "headers" );

	assert_eq!( host.call_on_request_body( stream, b"ab", false ).expect( "first chunk" ), Action::Pause );
	assert_eq!( host.call_on_request_body( stream, b"cd", true ).expect( "last chunk" ), Action::Continue );
	assert_eq!( host.get_current_request_body( stream ), b"abcd" );
}

#[test]
fn guest_reads_properties_through_its_allocator() {
	let mut host = emulator( EmulatorOptions::new().with_property( &[ "plugin_name" ], b"svcA".to_vec() ));

	host.tick().expect( "tick" );

	assert_eq!( host.get_logs( LogLevel::Info ), [ "svcA" ]);
}

#[test]
fn missing_property_leaves_the_guest_silent() {
	let mut host = emulator( EmulatorOptions::new() );
	host.tick().expect( "tick" );
	assert!( host.get_logs( LogLevel::Info ).is_empty() );
}

#[test]
fn missing_callbacks_continue() {
	let mut host = emulator( EmulatorOptions::new() );
	let stream = host.initialize_http_context().expect( "stream" );
	host.call_on_request_headers( stream, [( ":path", "/" )], false ).expect( "headers" );

	assert_eq!( host.call_on_response_body( stream, b"payload", true ).expect( "response body" ), Action::Continue );
	host.complete_http_context( stream ).expect( "completion" );
}
