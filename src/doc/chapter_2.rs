/*!
# Statements

One statement per line. Statements marked as program only raise
`ILLEGAL DIRECT` when typed without a line number.
*/

pub mod CAT {
    /*!
    ## `CAT`
    Lists saved files with their sizes in bytes.
    ```text
    CAT
    GAME            312
    ```
    */
}

pub mod CLEAR {
    /*!
    ## `CLEAR`
    Forgets every variable, active `FOR` loop and `GOSUB` return. A
    running program keeps running.
    */
}

pub mod CLS {
    /*!
    ## `CLS` `CON` `COFF` `AT row,col` `INK n` `PAPER n`
    Terminal control. Clear the screen, show or hide the cursor, move the
    cursor, set the text or background colour. Each one can stand alone
    as a statement or be printed and joined like a string.
    ```text
    PRINT AT 1,1 + INK 2 + "GREEN"
    ```
    Arguments outside 0 to 255, or outside what the terminal can
    express, are an `ILLEGAL FUNCTION CALL`.
    */
}

pub mod CONT {
    /*!
    ## `CONT`
    Resumes a program stopped by `STOP` or CTRL-C at the line after the
    one that stopped. After an error there is nothing to continue and
    `CONT` reports `CAN'T CONTINUE`.
    */
}

pub mod ERASE {
    /*!
    ## `ERASE "name"`
    Deletes a saved file.
    */
}

pub mod FOR {
    /*!
    ## `FOR var = start TO limit [STEP step]` Program only.
    Sets the variable to `start` and runs the lines down to the matching
    `NEXT` until the variable passes `limit`. The step defaults to 1 and
    may be negative. The loop variable must be a single letter.
    ```text
    10 FOR I = 1 TO 3
    20 PRINT I
    30 NEXT I
    RUN
    1
    2
    3
    ```
    While a loop on a letter is active, running its `FOR` line again
    does nothing. Leaving a loop with `GOTO` keeps it active until `RUN`
    or `CLEAR`.
    */
}

pub mod GOSUB {
    /*!
    ## `GOSUB line` Program only.
    Remembers this line and jumps. `RETURN` comes back to the line after
    it. Nesting deeper than 32 is a `GOSUB STACK OVERFLOW`.
    ```text
    10 GOSUB 100
    20 PRINT "DONE"
    30 STOP
    100 PRINT "SUB"
    110 RETURN
    ```
    */
}

pub mod GOTO {
    /*!
    ## `GOTO line`
    Jumps to a line. Typed directly it starts the program there without
    clearing variables. A line that does not exist is `UNDEFINED LINE`.
    */
}

pub mod IF {
    /*!
    ## `IF condition THEN statement` or `IF condition THEN line`
    Runs the statement, or jumps to the line, when the condition is not
    zero.
    ```text
    10 IF A$ = "Y" THEN PRINT "YES"
    20 IF X > 10 THEN 100
    ```
    */
}

pub mod INPUT {
    /*!
    ## `INPUT ["prompt" (,|;)] var`
    Prints the prompt, or `? `, then waits for a line of text. A numeric
    variable needs a number or the program stops with `SYNTAX ERROR`.
    */
}

pub mod LET {
    /*!
    ## `[LET] var = expression`
    Assigns a value. The word `LET` is optional.
    */
}

pub mod LIST {
    /*!
    ## `LIST [start[,count]]`
    Shows the program, from line `start` on and at most `count` lines.
    */
}

pub mod LOAD {
    /*!
    ## `LOAD "name"`
    Replaces the program and variables with a saved file. Memory is
    cleared before reading, even when the load then fails.
    */
}

pub mod NEW {
    /*!
    ## `NEW`
    Erases the program and all variables.
    */
}

pub mod NEXT {
    /*!
    ## `NEXT var` Program only.
    Steps the loop variable and jumps back to its `FOR` unless the limit
    is passed. Without an active loop it is `NEXT WITHOUT FOR`.
    */
}

pub mod PRINT {
    /*!
    ## `PRINT [item] [(,|;) item]...`
    Prints numbers and strings. A comma prints one space, a semicolon
    nothing. Ending with either one stays on the same line.
    ```text
    PRINT "A";1,2
    A1 2
    ```
    Numbers print with up to six significant digits.
    */
}

pub mod REM {
    /*!
    ## `REM anything`
    A remark. The rest of the line is kept exactly as typed.
    */
}

pub mod RETURN {
    /*!
    ## `RETURN` Program only.
    Goes back to the line after the last `GOSUB`. With nothing to go
    back to it is `RETURN WITHOUT GOSUB`.
    */
}

pub mod RUN {
    /*!
    ## `RUN`
    Clears variables, loops and returns, then runs from the first line.
    */
}

pub mod SAVE {
    /*!
    ## `SAVE "name"`
    Writes the program and every variable to a file.
    */
}

pub mod STOP {
    /*!
    ## `STOP`
    Stops with `BREAK IN line`. `CONT` picks up from the next line.
    */
}
