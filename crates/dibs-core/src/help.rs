//! Static help tables for the two command families.

pub const DEPLOY_HELP: &str = "\
deploy schedule <application>   - schedules a deploy for an application
deploy unschedule <application> - cancel deploy schedule for an application
deploy start <application>      - starts a deploy for an application
deploy cancel <application>     - cancels a deploy for an application
deploy complete <application>   - completes the application deploy and removes the user from the deployment queue
deploy next <application>       - return the first user in the deployment queue for the given application
deploy status <application>     - returns all the users in the deployment queue for the given application";

pub const UAT_HELP: &str = "\
uat grab <uat>     - allocates the user to the UAT if the UAT is available
uat release <uat>  - removes the user from the UAT
uat steal <uat>    - allocates the user to the UAT even if the UAT is not available
uat status         - returns all the default UAT names and the name of the person currently allocated to them
uat status <uat>   - returns the status of all listed UATs; multiple UAT names can be separated by commas or spaces
uat status all     - returns the status of all known UATs
uat default <uat>  - sets default UATs for the room (for use with `uat status`); multiple default UATs can be set, separated by commas or spaces";
