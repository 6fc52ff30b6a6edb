use proxy_wasm_link::{ Action, Context, Dispatcher, HostEmulator, Hostcalls, HttpContext, LogLevel };

struct Chatty ;

impl Context for Chatty {}

impl HttpContext for Chatty {
	fn on_http_request_headers( &mut self, host: &mut Hostcalls<'_>, num_headers: usize, _end_of_stream: bool ) -> Action {
		let _ = host.log_debug( &format!( "{num_headers} headers" ));
		let _ = host.log_warn( "slow upstream" );
		let _ = host.log_warn( "retrying" );
		let _ = host.log_critical( "giving up" );
		Action::Continue
	}
}

#[test]
fn logs_are_kept_per_level_in_order() {
	let mut host = HostEmulator::new( Dispatcher::for_http(| _ | Chatty ));
	let stream = host.initialize_http_context().expect( "stream" );
	host.call_on_request_headers( stream, [( ":path", "/" ), ( "host", "example.com" )], true ).expect( "headers" );

	assert_eq!( host.get_logs( LogLevel::Debug ), [ "2 headers" ]);
	assert_eq!( host.get_logs( LogLevel::Warn ), [ "slow upstream", "retrying" ]);
	assert_eq!( host.get_logs( LogLevel::Critical ), [ "giving up" ]);
	assert!( host.get_logs( LogLevel::Error ).is_empty() );
	assert!( host.get_logs( LogLevel::Info ).is_empty() );
}
