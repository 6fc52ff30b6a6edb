use proxy_wasm_link::{ Context, Dispatcher, EmulatorOptions, HostEmulator, HostError, Hostcalls, RootContext };
use crate::event_log::EventLog ;

struct NamedPlugin {
	events: EventLog,
}

impl Context for NamedPlugin {}

impl RootContext for NamedPlugin {
	fn on_configure( &mut self, host: &mut Hostcalls<'_>, _plugin_configuration_size: usize ) -> bool {
		match host.get_property( &[ "plugin_name" ]) {
			Ok( name ) => { self.events.push( String::from_utf8_lossy( &name )); true }
			Err( _ ) => false,
		}
	}
}

fn emulator( events: &EventLog, options: EmulatorOptions ) -> HostEmulator {
	let events = events.clone();
	HostEmulator::with_options( Dispatcher::new( move | _ | NamedPlugin { events: events.clone() }), options )
}

#[test]
fn seeded_properties_are_readable_by_the_guest() {
	let events = EventLog::default();
	let mut host = emulator( &events, EmulatorOptions::new().with_property( &[ "plugin_name" ], b"svcA".to_vec() ));

	assert!( host.start_plugin().expect( "plugin start" ));
	assert_eq!( events.events(), vec![ "svcA" ]);
}

#[test]
fn missing_property_is_not_found() {
	let events = EventLog::default();
	let mut host = emulator( &events, EmulatorOptions::new() );

	assert!( !host.start_plugin().expect( "plugin start" ));
	assert_eq!( host.get_property( &[ "plugin_name" ]), Err( HostError::NotFound ));
}

#[test]
fn nested_paths_are_distinct_properties() {
	let mut host = emulator( &EventLog::default(), EmulatorOptions::new() );

	host.set_property( &[ "route", "name" ], b"svcA" ).expect( "set" );

	assert_eq!( host.get_property( &[ "route", "name" ]), Ok( b"svcA".to_vec() ));
	assert_eq!( host.get_property( &[ "route" ]), Err( HostError::NotFound ));
	assert_eq!( host.get_property( &[ "routename" ]), Err( HostError::NotFound ));
}

#[test]
fn empty_paths_and_values_are_rejected() {
	let mut host = emulator( &EventLog::default(), EmulatorOptions::new() );
	assert_eq!( host.get_property( &[] ), Err( HostError::BadArgument ));
	assert_eq!( host.set_property( &[], b"v" ), Err( HostError::BadArgument ));
	assert_eq!( host.set_property( &[ "route" ], b"" ), Err( HostError::BadArgument ));
}
